//! Product table: model, serializer, and endpoint binding.

use crate::endpoint::TableEndpoint;
use crate::routes::table_routes;
use crate::schema::{ColumnDef, ColumnDefault, ColumnType, FieldSpec, Model, Serializer};
use crate::store::RowSource;
use axum::Router;
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn model() -> Model {
    Model::new("product", "products")
        .column(ColumnDef::new("name", ColumnType::Varchar(100)))
        .column(ColumnDef::new("price", ColumnType::Numeric { precision: 10, scale: 2 }))
        .column(ColumnDef::new("quantity", ColumnType::Integer))
        .column(ColumnDef::new("created_at", ColumnType::TimestampTz).default(ColumnDefault::Now))
}

pub fn serializer() -> Serializer {
    Serializer::new(
        "product",
        vec![
            FieldSpec::integer("id").label("ID").read_only(),
            FieldSpec::char("name").max_length(100),
            FieldSpec::decimal("price", 10, 2).min_value(Decimal::new(1, 2)),
            FieldSpec::integer("quantity").min_value(0).max_value(999_999),
            FieldSpec::datetime("created_at").read_only(),
        ],
    )
}

pub fn endpoint(source: Arc<dyn RowSource>) -> TableEndpoint {
    TableEndpoint::new(source, Arc::new(serializer()))
}

pub fn routes(source: Arc<dyn RowSource>) -> Router {
    table_routes(endpoint(source))
}

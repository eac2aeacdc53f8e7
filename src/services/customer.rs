//! Customer table: model, serializer, and endpoint binding.

use crate::endpoint::TableEndpoint;
use crate::routes::table_routes;
use crate::schema::{ColumnDef, ColumnDefault, ColumnType, FieldSpec, Model, Serializer};
use crate::store::RowSource;
use axum::Router;
use serde_json::json;
use std::sync::Arc;

pub fn model() -> Model {
    Model::new("customer", "customers")
        .column(ColumnDef::new("name", ColumnType::Varchar(100)))
        .column(ColumnDef::new("email", ColumnType::Varchar(254)).unique())
        .column(ColumnDef::new("is_active", ColumnType::Boolean).default(ColumnDefault::Bool(true)))
        .column(ColumnDef::new("created_at", ColumnType::TimestampTz).default(ColumnDefault::Now))
}

pub fn serializer() -> Serializer {
    Serializer::new(
        "customer",
        vec![
            FieldSpec::integer("id").label("ID").read_only(),
            FieldSpec::char("name").label("Имя").max_length(100),
            FieldSpec::email("email").label("Email").max_length(254).unique(),
            FieldSpec::boolean("is_active").label("Активен").default(json!(true)),
            FieldSpec::datetime("created_at").label("Дата создания").read_only(),
        ],
    )
}

pub fn endpoint(source: Arc<dyn RowSource>) -> TableEndpoint {
    TableEndpoint::new(source, Arc::new(serializer()))
}

pub fn routes(source: Arc<dyn RowSource>) -> Router {
    table_routes(endpoint(source))
}

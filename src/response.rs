//! Response bodies for table endpoints.

use crate::schema::ColumnDescriptor;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

/// `{"columns": [...], "rows": [...]}` for UI grids.
#[derive(Serialize)]
pub struct TableBody {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Value>,
}

pub fn table_ok(columns: Vec<ColumnDescriptor>, rows: Vec<Value>) -> (StatusCode, Json<TableBody>) {
    (StatusCode::OK, Json(TableBody { columns, rows }))
}

pub fn created(row: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(row))
}

//! Table handlers: list rows with column metadata, create one row.

use crate::endpoint::TableEndpoint;
use crate::error::AppError;
use crate::response::{created, table_ok};
use crate::schema::RequestValidator;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    let kind = match &value {
        Value::Object(_) => "",
        Value::Array(_) => "list",
        Value::String(_) => "str",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::Bool(_) => "bool",
        Value::Null => "NoneType",
    };
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            kind
        ))),
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::UnsupportedMediaType("Unsupported media type in request; expected application/json.".into())
        }
        other => AppError::Parse(format!("JSON parse error - {}", other.body_text())),
    }
}

pub async fn list(State(endpoint): State<TableEndpoint>) -> Result<impl IntoResponse, AppError> {
    let (source, serializer) = endpoint.bindings()?;
    let rows = source.fetch_all().await?;
    let rows: Vec<Value> = rows.iter().map(|r| serializer.to_representation(r)).collect();
    tracing::debug!(table = %source.model().table_name, count = rows.len(), "list");
    Ok(table_ok(serializer.columns().to_vec(), rows))
}

pub async fn create(
    State(endpoint): State<TableEndpoint>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let (source, serializer) = endpoint.bindings()?;
    let Json(body) = body.map_err(rejection_to_error)?;
    let body = body_to_map(body)?;
    let values = RequestValidator::validate(&body, serializer, source).await?;
    let row = match source.insert(&values).await {
        Ok(row) => row,
        Err(AppError::Unique { column }) => {
            return Err(AppError::field(&column, serializer.unique_message(&column)));
        }
        Err(e) => return Err(e),
    };
    tracing::info!(table = %source.model().table_name, id = %row[source.model().pk_column()], "row created");
    Ok(created(serializer.to_representation(&row)))
}

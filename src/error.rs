//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> list of messages, the body of a 400 validation response.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("serializer_class and queryset are required")]
    MissingBinding,
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("unique constraint violated on {column}")]
    Unique { column: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    UnsupportedMediaType(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Config(e) => {
                tracing::error!(error = %e, "table endpoint misconfigured");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
            }
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::Unique { column } => {
                let mut errors = FieldErrors::new();
                errors.insert(column, vec!["a row with this value already exists.".to_string()]);
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "non_field_errors": [message] }))).into_response()
            }
            AppError::Parse(message) => (StatusCode::BAD_REQUEST, Json(json!({ "detail": message }))).into_response(),
            AppError::UnsupportedMediaType(message) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(json!({ "detail": message }))).into_response()
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "database error" }))).into_response()
            }
        }
    }
}

//! Row sources: the persistence seam behind a table endpoint.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::schema::Model;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::sync::Arc;

/// Query source and writer for one model's table.
#[async_trait]
pub trait RowSource: Send + Sync {
    fn model(&self) -> &Model;

    /// All rows, ordered by primary key.
    async fn fetch_all(&self) -> Result<Vec<Value>, AppError>;

    /// Whether any row has `column = value`.
    async fn exists(&self, column: &str, value: &Value) -> Result<bool, AppError>;

    /// Insert one validated row and return it as stored, including server-assigned columns.
    /// A unique-constraint collision is reported as [`AppError::Unique`].
    async fn insert(&self, values: &Map<String, Value>) -> Result<Value, AppError>;
}

/// Where table rows live. Cheap to clone.
#[derive(Clone)]
pub enum Backend {
    Postgres { pool: PgPool, schema: String },
    Memory,
}

impl Backend {
    pub fn postgres(pool: PgPool, schema: impl Into<String>) -> Self {
        Backend::Postgres {
            pool,
            schema: schema.into(),
        }
    }

    pub fn memory() -> Self {
        Backend::Memory
    }

    /// Row source for one model. Memory sources are independent per call, so call once per model.
    pub fn source(&self, model: Model) -> Arc<dyn RowSource> {
        match self {
            Backend::Postgres { pool, schema } => Arc::new(PgStore::new(pool.clone(), schema.clone(), model)),
            Backend::Memory => Arc::new(MemoryStore::new(model)),
        }
    }

    /// Readiness probe. Returns the backend status string on success.
    pub async fn ping(&self) -> Result<&'static str, AppError> {
        match self {
            Backend::Postgres { pool, .. } => {
                sqlx::query("SELECT 1").fetch_optional(pool).await?;
                Ok("ok")
            }
            Backend::Memory => Ok("memory"),
        }
    }
}

//! In-process row source: same contract as PostgreSQL (serial ids, column defaults, unique columns).
//! Used when no DATABASE_URL is configured, and by tests.

use crate::error::AppError;
use crate::schema::{ColumnDefault, Model};
use crate::store::RowSource;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::Mutex;

pub struct MemoryStore {
    model: Model,
    table: Mutex<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    last_id: i64,
    rows: Vec<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new(model: Model) -> Self {
        MemoryStore {
            model,
            table: Mutex::new(MemoryTable::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryTable> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RowSource for MemoryStore {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, AppError> {
        let table = self.lock();
        Ok(table.rows.iter().cloned().map(Value::Object).collect())
    }

    async fn exists(&self, column: &str, value: &Value) -> Result<bool, AppError> {
        let table = self.lock();
        Ok(table.rows.iter().any(|r| r.get(column) == Some(value)))
    }

    async fn insert(&self, values: &Map<String, Value>) -> Result<Value, AppError> {
        let mut table = self.lock();
        for c in self.model.columns.iter().filter(|c| c.unique) {
            let Some(v) = values.get(&c.name).filter(|v| !v.is_null()) else { continue };
            if table.rows.iter().any(|r| r.get(&c.name) == Some(v)) {
                return Err(AppError::Unique { column: c.name.clone() });
            }
        }
        let id = table.last_id + 1;
        let mut row = Map::new();
        for c in &self.model.columns {
            let cell = if c.primary_key {
                Value::from(id)
            } else if let Some(v) = values.get(&c.name) {
                v.clone()
            } else {
                match &c.default {
                    Some(ColumnDefault::Bool(b)) => Value::Bool(*b),
                    Some(ColumnDefault::Now) => Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
                    None => Value::Null,
                }
            };
            row.insert(c.name.clone(), cell);
        }
        table.last_id = id;
        table.rows.push(row.clone());
        tracing::debug!(table = %self.model.table_name, id, "memory insert");
        Ok(Value::Object(row))
    }
}

//! PostgreSQL row source: parameterized SQL from the model, rows mapped back to JSON.

use crate::error::{AppError, ConfigError};
use crate::schema::Model;
use crate::sql::{exists_by_column, insert, select_all, QueryBuf};
use crate::store::RowSource;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use sqlx::Row;
use std::str::FromStr;

pub struct PgStore {
    pool: PgPool,
    schema: String,
    model: Model,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: String, model: Model) -> Self {
        PgStore { pool, schema, model }
    }

    fn bind_all<'q>(
        q: &'q QueryBuf,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
    }

    /// Unique violations become [`AppError::Unique`] naming the column the constraint guards.
    fn map_insert_error(&self, e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                if let Some(column) = db.constraint().and_then(|c| self.model.column_for_constraint(c)) {
                    return AppError::Unique {
                        column: column.to_string(),
                    };
                }
            }
        }
        AppError::Db(e)
    }
}

#[async_trait]
impl RowSource for PgStore {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, AppError> {
        let q = select_all(&self.model, &self.schema);
        tracing::debug!(sql = %q.sql, "query");
        let rows = Self::bind_all(&q).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn exists(&self, column: &str, value: &Value) -> Result<bool, AppError> {
        let q = exists_by_column(&self.model, &self.schema, column, value);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = Self::bind_all(&q).fetch_one(&self.pool).await?;
        Ok(row.try_get::<bool, _>(0)?)
    }

    async fn insert(&self, values: &Map<String, Value>) -> Result<Value, AppError> {
        let q = insert(&self.model, &self.schema, values);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = Self::bind_all(&q)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.map_insert_error(e))?;
        Ok(row_to_json(&row))
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339_opts(chrono::SecondsFormat::Micros, true));
    }
    if let Ok(Some(d)) = row.try_get::<Option<rust_decimal::Decimal>, _>(name) {
        return Value::String(d.to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}

/// Create the database named in `database_url` if it does not exist (connects to `postgres` to check).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", crate::sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| ConfigError::DatabaseUrl("no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/shop").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "shop");
    }

    #[test]
    fn keeps_query_string_on_admin_url() {
        let (admin, db) = parse_db_name_from_url("postgres://localhost/shop?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(db, "shop");
    }
}

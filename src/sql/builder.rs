//! Builds parameterized SELECT, EXISTS and INSERT from a model declaration.

use crate::schema::Model;
use crate::sql::params::PgBindValue;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from declarations).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// SELECT list in declaration order. NUMERIC comes back as `Decimal` with its column scale.
fn select_column_list(model: &Model) -> String {
    model
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT every row, ORDER BY pk. No filters, no paging.
pub fn select_all(model: &Model, schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, &model.table_name);
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(model),
        table,
        quoted(model.pk_column())
    );
    q
}

/// SELECT EXISTS(... WHERE column = $1). Used by uniqueness checks before insert.
pub fn exists_by_column(model: &Model, schema: &str, column: &str, value: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, &model.table_name);
    let ph = match model.column_by_name(column) {
        Some(c) => {
            let n = q.push_param(PgBindValue::for_column(&c.column_type, value));
            format!("${}::{}", n, c.column_type.cast())
        }
        None => format!("${}", q.push_param(PgBindValue::from_json(value))),
    };
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = {})",
        table,
        quoted(column),
        ph
    );
    q
}

/// INSERT: columns and placeholders from the model; values from the validated body.
/// Omits the primary key and any column with a database default that the body does not provide,
/// so `created_at` is always assigned by the database.
/// Placeholders carry the column cast (e.g. `$n::varchar`); NUMERIC values bind as `Decimal`.
pub fn insert(model: &Model, schema: &str, values: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, &model.table_name);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &model.columns {
        if c.primary_key {
            continue;
        }
        let val = values.get(&c.name);
        if val.is_none() && c.has_default() {
            continue;
        }
        let param_num = q.push_param(PgBindValue::for_column(&c.column_type, val.unwrap_or(&Value::Null)));
        cols.push(quoted(&c.name));
        placeholders.push(format!("${}::{}", param_num, c.column_type.cast()));
    }
    let returning = select_column_list(model);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDef, ColumnDefault, ColumnType};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn product() -> Model {
        Model::new("product", "products")
            .column(ColumnDef::new("name", ColumnType::Varchar(100)))
            .column(ColumnDef::new("price", ColumnType::Numeric { precision: 10, scale: 2 }))
            .column(ColumnDef::new("created_at", ColumnType::TimestampTz).default(ColumnDefault::Now))
    }

    #[test]
    fn select_all_orders_by_pk() {
        let q = select_all(&product(), "public");
        assert_eq!(
            q.sql,
            r#"SELECT "id", "name", "price", "created_at" FROM "public"."products" ORDER BY "id""#
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_skips_pk_and_defaults() {
        let values = json!({ "name": "Lamp", "price": "10.00" }).as_object().cloned().unwrap();
        let q = insert(&product(), "shop", &values);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "shop"."products" ("name", "price") VALUES ($1::varchar, $2::numeric) RETURNING "id", "name", "price", "created_at""#
        );
        assert_eq!(
            q.params,
            vec![PgBindValue::String("Lamp".into()), PgBindValue::Decimal(Decimal::new(1000, 2))]
        );
    }

    #[test]
    fn exists_binds_with_cast() {
        let q = exists_by_column(&product(), "public", "name", &json!("Lamp"));
        assert_eq!(
            q.sql,
            r#"SELECT EXISTS(SELECT 1 FROM "public"."products" WHERE "name" = $1::varchar)"#
        );
        assert_eq!(q.params, vec![PgBindValue::String("Lamp".into())]);
    }

    #[test]
    fn identifiers_are_escaped() {
        assert_eq!(quoted(r#"we"ird"#), r#""we""ird""#);
    }
}

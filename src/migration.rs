//! Apply model declarations to the database: CREATE SCHEMA and CREATE TABLE with unique constraints.

use crate::error::AppError;
use crate::schema::Model;
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

/// DDL for one model. Idempotent (IF NOT EXISTS); existing tables are left untouched.
pub fn create_table_sql(model: &Model, schema: &str) -> String {
    let mut defs: Vec<String> = Vec::new();
    for c in &model.columns {
        let mut def = format!("{} {}", quoted(&c.name), c.column_type.ddl());
        if !c.primary_key {
            def.push_str(" NOT NULL");
        }
        if let Some(d) = &c.default {
            def.push_str(" DEFAULT ");
            def.push_str(d.ddl());
        }
        defs.push(def);
    }
    defs.push(format!("PRIMARY KEY ({})", quoted(model.pk_column())));
    for c in model.columns.iter().filter(|c| c.unique) {
        defs.push(format!(
            "CONSTRAINT {} UNIQUE ({})",
            quoted(&model.unique_constraint_name(&c.name)),
            quoted(&c.name)
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(schema, &model.table_name),
        defs.join(",\n  ")
    )
}

/// CREATE SCHEMA IF NOT EXISTS, then one table per model.
pub async fn apply_migrations(pool: &PgPool, schema: &str, models: &[Model]) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;
    for model in models {
        let sql = create_table_sql(model, schema);
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
        tracing::info!(table = %model.table_name, schema = %schema, "table ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDef, ColumnDefault, ColumnType};

    #[test]
    fn customer_table_ddl() {
        let model = Model::new("customer", "customers")
            .column(ColumnDef::new("name", ColumnType::Varchar(100)))
            .column(ColumnDef::new("email", ColumnType::Varchar(254)).unique())
            .column(ColumnDef::new("is_active", ColumnType::Boolean).default(ColumnDefault::Bool(true)))
            .column(ColumnDef::new("created_at", ColumnType::TimestampTz).default(ColumnDefault::Now));
        let expected = concat!(
            "CREATE TABLE IF NOT EXISTS \"public\".\"customers\" (\n",
            "  \"id\" BIGSERIAL,\n",
            "  \"name\" VARCHAR(100) NOT NULL,\n",
            "  \"email\" VARCHAR(254) NOT NULL,\n",
            "  \"is_active\" BOOLEAN NOT NULL DEFAULT TRUE,\n",
            "  \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(),\n",
            "  PRIMARY KEY (\"id\"),\n",
            "  CONSTRAINT \"customers_email_key\" UNIQUE (\"email\")\n",
            ")"
        );
        assert_eq!(create_table_sql(&model, "public"), expected);
    }
}

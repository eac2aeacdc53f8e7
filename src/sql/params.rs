//! Convert serde_json::Value to types that sqlx can bind.

use crate::schema::{decimal_from_json, ColumnType};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value that can be bound to a PostgreSQL query. Converts from serde_json::Value.
/// Placeholders carry an explicit `::type` cast, so each variant only needs to report its own wire type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    Decimal(Decimal),
    String(String),
    Json(Value),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PgBindValue::I64(i),
                None => PgBindValue::String(n.to_string()),
            },
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Json(v.clone()),
        }
    }

    /// Like [`PgBindValue::from_json`], but values for NUMERIC columns bind as [`Decimal`].
    pub fn for_column(column_type: &ColumnType, v: &Value) -> Self {
        match column_type {
            ColumnType::Numeric { .. } => decimal_from_json(v)
                .map(PgBindValue::Decimal)
                .unwrap_or_else(|| Self::from_json(v)),
            _ => Self::from_json(v),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => IsNull::Yes,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::Decimal(d) => <Decimal as Encode<Postgres>>::encode_by_ref(d, buf)?,
            PgBindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBindValue::Json(v) => <serde_json::Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::String(_) => PgTypeInfo::with_name("TEXT"),
            PgBindValue::Bool(_) => PgTypeInfo::with_name("BOOL"),
            PgBindValue::I64(_) => PgTypeInfo::with_name("INT8"),
            PgBindValue::Decimal(_) => PgTypeInfo::with_name("NUMERIC"),
            PgBindValue::Json(_) => PgTypeInfo::with_name("JSONB"),
        })
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_json_scalars() {
        assert_eq!(PgBindValue::from_json(&json!(null)), PgBindValue::Null);
        assert_eq!(PgBindValue::from_json(&json!(true)), PgBindValue::Bool(true));
        assert_eq!(PgBindValue::from_json(&json!(5)), PgBindValue::I64(5));
        assert_eq!(PgBindValue::from_json(&json!(2.5)), PgBindValue::String("2.5".into()));
        assert_eq!(PgBindValue::from_json(&json!("10.00")), PgBindValue::String("10.00".into()));
        assert_eq!(PgBindValue::from_json(&json!([1])), PgBindValue::Json(json!([1])));
    }

    #[test]
    fn numeric_columns_bind_decimals() {
        let numeric = ColumnType::Numeric { precision: 10, scale: 2 };
        assert_eq!(
            PgBindValue::for_column(&numeric, &json!("1000.00")),
            PgBindValue::Decimal(Decimal::new(100000, 2))
        );
        assert_eq!(PgBindValue::for_column(&numeric, &json!(49.9)), PgBindValue::Decimal(Decimal::new(499, 1)));
        assert_eq!(PgBindValue::for_column(&numeric, &json!(null)), PgBindValue::Null);
        assert_eq!(
            PgBindValue::for_column(&ColumnType::Varchar(10), &json!("10.00")),
            PgBindValue::String("10.00".into())
        );
    }
}

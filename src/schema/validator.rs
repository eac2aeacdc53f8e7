//! Request validation from serializer field rules.

use crate::error::{AppError, FieldErrors};
use crate::schema::serializer::{decimal_from_json, quantize, FieldKind, FieldSpec, Serializer};
use crate::store::RowSource;
use chrono::{DateTime, SecondsFormat};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::sync::LazyLock;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9-]{1,62}[A-Za-z0-9]$",
    )
    .expect("email pattern compiles")
});

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against the serializer, then check unique fields against existing rows.
    /// Returns the writable values ready for insert.
    pub async fn validate(
        body: &Map<String, Value>,
        serializer: &Serializer,
        source: &dyn RowSource,
    ) -> Result<Map<String, Value>, AppError> {
        let (values, mut errors) = Self::validate_fields(body, serializer);
        for field in serializer.fields().iter().filter(|f| f.unique) {
            if errors.contains_key(&field.name) {
                continue;
            }
            let Some(value) = values.get(&field.name) else { continue };
            if value.is_null() {
                continue;
            }
            if source.exists(&field.name, value).await? {
                errors.insert(field.name.clone(), vec![serializer.unique_message(&field.name)]);
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Field-level rules only. Unknown keys and read-only fields in the body are ignored.
    /// All failing fields are reported, not just the first.
    pub fn validate_fields(body: &Map<String, Value>, serializer: &Serializer) -> (Map<String, Value>, FieldErrors) {
        let mut values = Map::new();
        let mut errors = FieldErrors::new();
        for field in serializer.fields() {
            if field.read_only {
                continue;
            }
            match body.get(&field.name) {
                None => {
                    if let Some(default) = &field.default {
                        values.insert(field.name.clone(), default.clone());
                    } else if field.required {
                        errors.insert(field.name.clone(), vec![REQUIRED.to_string()]);
                    }
                }
                Some(Value::Null) => {
                    errors.insert(field.name.clone(), vec![NOT_NULL.to_string()]);
                }
                Some(raw) => match validate_field(field, raw) {
                    Ok(v) => {
                        values.insert(field.name.clone(), v);
                    }
                    Err(messages) => {
                        errors.insert(field.name.clone(), messages);
                    }
                },
            }
        }
        (values, errors)
    }
}

fn validate_field(field: &FieldSpec, raw: &Value) -> Result<Value, Vec<String>> {
    match field.kind {
        FieldKind::Char => validate_char(field, raw).map(Value::String),
        FieldKind::Email => {
            let s = validate_char(field, raw)?;
            if !EMAIL_RE.is_match(&s) {
                return Err(vec!["Enter a valid email address.".into()]);
            }
            Ok(Value::String(s))
        }
        FieldKind::Boolean => to_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| vec!["Must be a valid boolean.".into()]),
        FieldKind::Integer => {
            let n = to_i64(raw).ok_or_else(|| vec!["A valid integer is required.".to_string()])?;
            check_bounds(field, Decimal::from(n))?;
            Ok(Value::from(n))
        }
        FieldKind::Decimal => validate_decimal(field, raw).map(Value::String),
        FieldKind::DateTime => {
            let s = raw.as_str().unwrap_or_default();
            DateTime::parse_from_rfc3339(s.trim())
                .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::Micros, true)))
                .map_err(|_| {
                    vec!["Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z].".into()]
                })
        }
    }
}

fn validate_char(field: &FieldSpec, raw: &Value) -> Result<String, Vec<String>> {
    let s = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(vec!["Not a valid string.".into()]),
    };
    if s.is_empty() {
        return Err(vec![NOT_BLANK.into()]);
    }
    if let Some(max) = field.max_length {
        if s.chars().count() > max {
            return Err(vec![format!("Ensure this field has no more than {} characters.", max)]);
        }
    }
    Ok(s)
}

fn validate_decimal(field: &FieldSpec, raw: &Value) -> Result<String, Vec<String>> {
    let d = decimal_from_json(raw).ok_or_else(|| vec!["A valid number is required.".to_string()])?;
    let places = field.decimal_places.unwrap_or(0);
    if let Some(max_digits) = field.max_digits {
        let (total, whole, decimals) = digit_counts(&d);
        let max_whole = max_digits.saturating_sub(places);
        if total > max_digits {
            return Err(vec![format!(
                "Ensure that there are no more than {} digits in total.",
                max_digits
            )]);
        } else if decimals > places {
            return Err(vec![format!(
                "Ensure that there are no more than {} decimal places.",
                places
            )]);
        } else if whole > max_whole {
            return Err(vec![format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                max_whole
            )]);
        }
    }
    check_bounds(field, d)?;
    Ok(quantize(d, places))
}

/// (total digits, whole digits, decimal places) counted from the value as written.
/// Leading zeros do not count; trailing fraction zeros do.
fn digit_counts(d: &Decimal) -> (u32, u32, u32) {
    let digits = d.mantissa().unsigned_abs().to_string().len() as u32;
    let scale = d.scale();
    if scale >= digits {
        (scale, 0, scale)
    } else {
        (digits, digits - scale, scale)
    }
}

fn check_bounds(field: &FieldSpec, n: Decimal) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if let Some(min) = field.min_value {
        if n < min {
            errors.push(format!("Ensure this value is greater than or equal to {}.", min));
        }
    }
    if let Some(max) = field.max_value {
        if n > max {
            errors.push(format!("Ensure this value is less than or equal to {}.", max));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn to_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(true),
            Some(x) if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "t" | "y" | "yes" | "true" | "on" | "1" => Some(true),
            "f" | "n" | "no" | "false" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            let s = match s.split_once('.') {
                Some((int, frac)) if frac.bytes().all(|b| b == b'0') => int,
                _ => s,
            };
            s.parse().ok()
        }
        _ => None,
    }
}

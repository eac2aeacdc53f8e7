//! Serializer declarations: per-field wire representation and validation rules.

use crate::schema::columns::{describe_fields, humanize, ColumnDescriptor};
use chrono::{DateTime, SecondsFormat};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("decimal pattern compiles"));

/// Validation/coercion kind of a serializer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Char,
    Email,
    Boolean,
    DateTime,
    Decimal,
}

impl FieldKind {
    /// Name reported in column metadata; the UI grid switches on these.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "IntegerField",
            FieldKind::Char => "CharField",
            FieldKind::Email => "EmailField",
            FieldKind::Boolean => "BooleanField",
            FieldKind::DateTime => "DateTimeField",
            FieldKind::Decimal => "DecimalField",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub label: Option<String>,
    pub read_only: bool,
    pub required: bool,
    /// Used when the field is absent from the request body.
    pub default: Option<Value>,
    pub max_length: Option<usize>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub max_digits: Option<u32>,
    pub decimal_places: Option<u32>,
    /// Checked against existing rows before insert.
    pub unique: bool,
}

impl FieldSpec {
    fn new(name: &str, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.to_string(),
            kind,
            label: None,
            read_only: false,
            required: true,
            default: None,
            max_length: None,
            min_value: None,
            max_value: None,
            max_digits: None,
            decimal_places: None,
            unique: false,
        }
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn char(name: &str) -> Self {
        Self::new(name, FieldKind::Char)
    }

    pub fn email(name: &str) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn datetime(name: &str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub fn decimal(name: &str, max_digits: u32, decimal_places: u32) -> Self {
        let mut f = Self::new(name, FieldKind::Decimal);
        f.max_digits = Some(max_digits);
        f.decimal_places = Some(decimal_places);
        f
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Emitted in responses, ignored in request bodies.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.required = false;
        self
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn min_value(mut self, n: impl Into<Decimal>) -> Self {
        self.min_value = Some(n.into());
        self
    }

    pub fn max_value(mut self, n: impl Into<Decimal>) -> Self {
        self.max_value = Some(n.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Explicit label, or the humanized field name.
    pub fn display_label(&self) -> String {
        match self.label.as_deref() {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => humanize(&self.name),
        }
    }

    /// Wire form of one stored cell.
    pub fn represent(&self, value: &Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }
        match self.kind {
            FieldKind::Integer => match value {
                Value::String(s) => s.trim().parse::<i64>().map(Value::from).unwrap_or_else(|_| value.clone()),
                _ => value.clone(),
            },
            FieldKind::Decimal => decimal_from_json(value)
                .map(|d| Value::String(quantize(d, self.decimal_places.unwrap_or(0))))
                .unwrap_or_else(|| value.clone()),
            FieldKind::DateTime => match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::Micros, true)))
                    .unwrap_or_else(|_| value.clone()),
                _ => value.clone(),
            },
            FieldKind::Char | FieldKind::Email | FieldKind::Boolean => value.clone(),
        }
    }
}

/// Ordered field declarations for one model plus the column metadata derived from them.
#[derive(Clone, Debug)]
pub struct Serializer {
    model_name: String,
    fields: Vec<FieldSpec>,
    columns: Vec<ColumnDescriptor>,
}

impl Serializer {
    pub fn new(model_name: &str, fields: Vec<FieldSpec>) -> Self {
        let columns = describe_fields(&fields);
        Serializer {
            model_name: model_name.to_string(),
            fields,
            columns,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Column descriptors, one per declared field, in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Serialize one stored row. Columns without a declared field are dropped.
    pub fn to_representation(&self, row: &Value) -> Value {
        let mut out = Map::new();
        for f in &self.fields {
            let cell = row.get(&f.name).unwrap_or(&Value::Null);
            out.insert(f.name.clone(), f.represent(cell));
        }
        Value::Object(out)
    }

    /// Message reported when a unique field collides with an existing row. The label is used as declared.
    pub fn unique_message(&self, field: &str) -> String {
        let label = self
            .field(field)
            .map(FieldSpec::display_label)
            .unwrap_or_else(|| humanize(field));
        format!("{} with this {} already exists.", self.model_name, label)
    }
}

/// Plain decimal text (`[+-]digits[.digits]`, no exponent) or a JSON number.
/// Scale is kept as written, so `"1.230"` has three places.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if !DECIMAL_RE.is_match(&text) {
        return None;
    }
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text.as_str())),
    };
    let unsigned = unsigned.trim_end_matches('.');
    let unsigned = if unsigned.starts_with('.') {
        format!("0{}", unsigned)
    } else {
        unsigned.to_string()
    };
    let mut d = Decimal::from_str_exact(&unsigned).ok()?;
    d.set_sign_negative(negative && !d.is_zero());
    Some(d)
}

/// Fixed-point text with exactly `places` fraction digits.
pub fn quantize(d: Decimal, places: u32) -> String {
    let mut d = d.round_dp(places);
    d.rescale(places);
    if d.is_zero() {
        d.set_sign_negative(false);
    }
    d.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn serializer() -> Serializer {
        Serializer::new(
            "product",
            vec![
                FieldSpec::integer("id").label("ID").read_only(),
                FieldSpec::char("name").max_length(100),
                FieldSpec::decimal("price", 10, 2),
                FieldSpec::datetime("created_at").read_only(),
            ],
        )
    }

    #[test]
    fn representation_keeps_declared_fields_only() {
        let row = json!({
            "created_at": "2024-03-01T10:00:00+00:00",
            "price": "12.5",
            "name": "Lamp",
            "id": 3,
            "internal": "x"
        });
        let out = serializer().to_representation(&row);
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(out["price"], json!("12.50"));
        assert_eq!(out["created_at"], json!("2024-03-01T10:00:00.000000Z"));
        assert!(out.get("internal").is_none());
    }

    #[test]
    fn missing_cells_become_null() {
        let out = serializer().to_representation(&json!({ "id": 1 }));
        assert_eq!(out["name"], Value::Null);
    }

    #[test]
    fn unique_message_keeps_declared_label() {
        let s = Serializer::new(
            "customer",
            vec![
                FieldSpec::email("email").label("Email").unique(),
                FieldSpec::char("short_code").unique(),
            ],
        );
        assert_eq!(s.unique_message("email"), "customer with this Email already exists.");
        assert_eq!(s.unique_message("short_code"), "customer with this Short code already exists.");
    }

    #[test]
    fn decimal_text_keeps_written_scale() {
        let d = decimal_from_json(&json!("1.230")).unwrap();
        assert_eq!(d.scale(), 3);
        assert_eq!(d.mantissa(), 1230);
        let d = decimal_from_json(&json!("007.5")).unwrap();
        assert_eq!((d.mantissa(), d.scale()), (75, 1));
        assert_eq!(decimal_from_json(&json!(".5")).unwrap().scale(), 1);
        assert_eq!(decimal_from_json(&json!(-2.25)).unwrap().to_string(), "-2.25");
    }

    #[test]
    fn rejects_non_decimal_text() {
        for bad in ["", ".", "abc", "1.2.3", "1e5", "--1", " - ", "1_000"] {
            assert!(decimal_from_json(&json!(bad)).is_none(), "{bad:?} should not parse");
        }
        assert!(decimal_from_json(&json!(true)).is_none());
    }

    #[test]
    fn quantize_pads_and_rounds() {
        let q = |s: &str, places| quantize(decimal_from_json(&json!(s)).unwrap(), places);
        assert_eq!(q("1000", 2), "1000.00");
        assert_eq!(q(".5", 2), "0.50");
        assert_eq!(q("-0.0", 2), "0.00");
        assert_eq!(q("12.5", 2), "12.50");
        assert_eq!(q("10.00", 2), "10.00");
    }
}

//! Column metadata for UI grids, derived from serializer field declarations.

use crate::schema::serializer::FieldSpec;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub label: String,
    pub field: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// `is_active` -> "Is active": underscores to spaces, first letter upper, rest lower.
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// One descriptor per declared field, in declaration order.
pub fn describe_fields(fields: &[FieldSpec]) -> Vec<ColumnDescriptor> {
    fields
        .iter()
        .map(|f| ColumnDescriptor {
            label: f.display_label(),
            field: f.name.clone(),
            type_: f.kind.type_name().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn humanize_replaces_underscores_and_capitalizes() {
        assert_eq!(humanize("is_active"), "Is active");
        assert_eq!(humanize("created_at"), "Created at");
        assert_eq!(humanize("email"), "Email");
        assert_eq!(humanize("ID_code"), "Id code");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn explicit_label_wins() {
        let fields = vec![
            FieldSpec::integer("id").label("ID").read_only(),
            FieldSpec::boolean("is_active"),
            FieldSpec::char("name").label(""),
        ];
        let cols = describe_fields(&fields);
        assert_eq!(cols[0].label, "ID");
        assert_eq!(cols[1].label, "Is active");
        assert_eq!(cols[2].label, "Name");
    }

    #[test]
    fn descriptor_wire_shape() {
        let cols = describe_fields(&[FieldSpec::email("email")]);
        assert_eq!(
            serde_json::to_value(&cols).unwrap(),
            json!([{ "label": "Email", "field": "email", "type": "EmailField" }])
        );
    }
}

//! Data model declarations: one relational table per model, built once at startup.

/// Column storage type. Drives DDL, SQL casts when binding JSON values, and the in-memory store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    BigSerial,
    Varchar(u32),
    Boolean,
    Integer,
    Numeric { precision: u32, scale: u32 },
    TimestampTz,
}

impl ColumnType {
    /// Type as written in CREATE TABLE.
    pub fn ddl(&self) -> String {
        match self {
            ColumnType::BigSerial => "BIGSERIAL".into(),
            ColumnType::Varchar(n) => format!("VARCHAR({})", n),
            ColumnType::Boolean => "BOOLEAN".into(),
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::Numeric { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
            ColumnType::TimestampTz => "TIMESTAMPTZ".into(),
        }
    }

    /// Type used in `$n::type` placeholder casts.
    pub fn cast(&self) -> &'static str {
        match self {
            ColumnType::BigSerial => "bigint",
            ColumnType::Varchar(_) => "varchar",
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Numeric { .. } => "numeric",
            ColumnType::TimestampTz => "timestamptz",
        }
    }
}

/// Value the persistence layer assigns when the insert omits the column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnDefault {
    Bool(bool),
    /// Insertion time; never rewritten afterwards.
    Now,
}

impl ColumnDefault {
    pub fn ddl(&self) -> &'static str {
        match self {
            ColumnDefault::Bool(true) => "TRUE",
            ColumnDefault::Bool(false) => "FALSE",
            ColumnDefault::Now => "NOW()",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub unique: bool,
    pub primary_key: bool,
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        ColumnDef {
            name: name.to_string(),
            column_type,
            unique: false,
            primary_key: false,
            default: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Whether the database fills this column when the insert leaves it out.
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.column_type == ColumnType::BigSerial
    }
}

#[derive(Clone, Debug)]
pub struct Model {
    /// Lower-case singular name used in messages, e.g. "customer".
    pub name: String,
    pub table_name: String,
    pub columns: Vec<ColumnDef>,
}

impl Model {
    /// New model with the implicit auto-incrementing `id` primary key.
    pub fn new(name: &str, table_name: &str) -> Self {
        let mut id = ColumnDef::new("id", ColumnType::BigSerial);
        id.primary_key = true;
        Model {
            name: name.to_string(),
            table_name: table_name.to_string(),
            columns: vec![id],
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn pk_column(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .unwrap_or("id")
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Constraint name given to a single-column UNIQUE, matching PostgreSQL's own naming.
    pub fn unique_constraint_name(&self, column: &str) -> String {
        format!("{}_{}_key", self.table_name, column)
    }

    /// Reverse of [`Model::unique_constraint_name`].
    pub fn column_for_constraint(&self, constraint: &str) -> Option<&str> {
        self.columns
            .iter()
            .filter(|c| c.unique)
            .find(|c| self.unique_constraint_name(&c.name) == constraint)
            .map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model::new("customer", "customers")
            .column(ColumnDef::new("email", ColumnType::Varchar(254)).unique())
            .column(ColumnDef::new("is_active", ColumnType::Boolean).default(ColumnDefault::Bool(true)))
    }

    #[test]
    fn implicit_primary_key_comes_first() {
        let m = model();
        assert_eq!(m.pk_column(), "id");
        assert_eq!(m.columns[0].name, "id");
        assert!(m.columns[0].has_default());
    }

    #[test]
    fn constraint_name_maps_back_to_column() {
        let m = model();
        assert_eq!(m.unique_constraint_name("email"), "customers_email_key");
        assert_eq!(m.column_for_constraint("customers_email_key"), Some("email"));
        assert_eq!(m.column_for_constraint("customers_is_active_key"), None);
    }

    #[test]
    fn ddl_types() {
        assert_eq!(ColumnType::Numeric { precision: 10, scale: 2 }.ddl(), "NUMERIC(10, 2)");
        assert_eq!(ColumnType::Varchar(100).ddl(), "VARCHAR(100)");
        assert_eq!(ColumnDefault::Now.ddl(), "NOW()");
    }
}

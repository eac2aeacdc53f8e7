//! Static model and serializer declarations, column metadata, and request validation.

pub mod columns;
pub mod model;
pub mod serializer;
pub mod validator;

pub use columns::{describe_fields, humanize, ColumnDescriptor};
pub use model::{ColumnDef, ColumnDefault, ColumnType, Model};
pub use serializer::{decimal_from_json, quantize, FieldKind, FieldSpec, Serializer};
pub use validator::RequestValidator;

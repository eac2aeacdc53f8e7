//! Table view: generic list/create endpoints with column metadata for UI grids.

pub mod app;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod schema;
pub mod services;
pub mod settings;
pub mod sql;
pub mod store;

pub use app::build_app;
pub use endpoint::TableEndpoint;
pub use error::{AppError, ConfigError, FieldErrors};
pub use migration::apply_migrations;
pub use routes::{common_routes, table_routes};
pub use schema::{ColumnDescriptor, FieldSpec, Model, Serializer};
pub use settings::Settings;
pub use store::{ensure_database_exists, Backend, MemoryStore, PgStore, RowSource};

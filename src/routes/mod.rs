//! Routers: common probes and per-table endpoints.

pub mod common;
pub mod table;

pub use common::common_routes;
pub use table::table_routes;

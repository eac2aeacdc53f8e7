//! HTTP handlers for table endpoints.

pub mod table;
pub use table::*;

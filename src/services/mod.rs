//! Domain services. Each declares a model and a serializer and binds them to a table endpoint.

pub mod customer;
pub mod product;

use crate::schema::Model;

/// Every model the server mounts, for migrations.
pub fn models() -> Vec<Model> {
    vec![customer::model(), product::model()]
}

//! Table routes: GET lists rows with column metadata, POST creates a row.

use crate::endpoint::TableEndpoint;
use crate::handlers::table::{create, list};
use axum::{routing::get, Router};

/// `/table` bound to one endpoint. Nest under a service prefix, e.g. `/api/customers`.
pub fn table_routes(endpoint: TableEndpoint) -> Router {
    Router::new()
        .route("/table", get(list).post(create))
        .with_state(endpoint)
}

//! Router assembly: probes at the root, one table endpoint per domain service under `/api`.

use crate::routes::common_routes;
use crate::services::{customer, product};
use crate::store::Backend;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// `GET|POST /api/customers/table`, `GET|POST /api/products/table`, plus `/health`, `/ready`, `/version`.
pub fn build_app(backend: &Backend, body_limit: usize) -> Router {
    let api = Router::new()
        .nest("/customers", customer::routes(backend.source(customer::model())))
        .nest("/products", product::routes(backend.source(product::model())));

    Router::new()
        .merge(common_routes(backend.clone()))
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

//! Runs against a live PostgreSQL when DATABASE_URL is set; skipped otherwise.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use table_view::services::models;
use table_view::{apply_migrations, build_app, Backend};
use tower::util::ServiceExt;

async fn call(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn customers_and_products_round_trip_through_postgres() {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();
    let schema = format!(
        "table_view_test_{}_{}",
        std::process::id(),
        chrono::Utc::now().timestamp_micros()
    );
    apply_migrations(&pool, &schema, &models()).await.unwrap();
    // Second run is a no-op.
    apply_migrations(&pool, &schema, &models()).await.unwrap();

    let app = build_app(&Backend::postgres(pool.clone(), schema.clone()), 1024 * 1024);

    let (status, _) = call(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/customers/table",
        Some(json!({ "name": "Ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_active"], json!(true));
    assert!(created["created_at"].as_str().unwrap().ends_with('Z'));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/customers/table",
        Some(json!({ "name": "Ada again", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "email": ["customer with this Email already exists."] }));

    let (_, listed) = call(&app, Method::GET, "/api/customers/table", None).await;
    assert_eq!(listed["rows"].as_array().unwrap().len(), 1);
    assert_eq!(listed["rows"][0]["email"], json!("ada@example.com"));
    assert_eq!(listed["rows"][0]["id"], created["id"]);

    let (status, product) = call(
        &app,
        Method::POST,
        "/api/products/table",
        Some(json!({ "name": "Desk", "price": "1000", "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["price"], json!("1000.00"));

    let (_, listed) = call(&app, Method::GET, "/api/products/table", None).await;
    assert_eq!(listed["rows"][0]["price"], json!("1000.00"));
    assert_eq!(listed["rows"][0]["quantity"], json!(2));

    sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", schema))
        .execute(&pool)
        .await
        .unwrap();
}

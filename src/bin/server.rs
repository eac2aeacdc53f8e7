//! Table view server: customers and products tables over PostgreSQL, or in memory when
//! DATABASE_URL is unset.

use table_view::services::models;
use table_view::{apply_migrations, build_app, ensure_database_exists, Backend, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("table_view=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let backend = match &settings.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;
            apply_migrations(&pool, &settings.schema, &models()).await?;
            Backend::postgres(pool, settings.schema.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set; rows are kept in memory and lost on restart");
            Backend::memory()
        }
    };

    let app = build_app(&backend, settings.body_limit);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

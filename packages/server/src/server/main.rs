// Main entry point for the studio API server

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use studio_core::{
    domains::auth::JwtService,
    kernel::{HttpBlobOrigin, PostgresStore, ServerDeps},
    server::build_app,
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,studio_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting studio API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let blob_origin = HttpBlobOrigin::new(config.blob_origin_url.clone())
        .context("Invalid BLOB_ORIGIN_URL")?;
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());

    let server_deps = ServerDeps::new(
        Arc::new(PostgresStore::new(pool)),
        Arc::new(blob_origin),
        Arc::new(jwt_service),
    )
    .with_selection_retry_budget(config.selection_retry_budget);

    // Migrations run through the initializer so requests share the outcome
    server_deps
        .initializer
        .ensure(server_deps.store.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to initialize store")?;

    // Build application
    let app = build_app(server_deps, config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use codedrill_api::{config, db, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("starting codedrill-api in {:?} mode", config.environment);

    let pool = db::connect_lazy().context("failed to build database pool")?;

    // The server still boots when the database is down; /health reports
    // degraded and storage-backed endpoints fail per request.
    match db::migrate(&pool).await {
        Ok(()) => tracing::info!("database migrations applied"),
        Err(e) => tracing::warn!("skipping migrations, database unavailable: {}", e),
    }

    let app = routes::app(AppState { pool });

    // Allow tests or deployments to override port via env
    let port = std::env::var("CODEDRILL_API_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("codedrill-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;

    Ok(())
}

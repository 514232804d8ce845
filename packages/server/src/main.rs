use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use festival_server::build_router;
use festival_server::config::AppConfig;
use festival_server::database::{Database, schema};
use festival_server::state::AppState;
use festival_server::store::SqlStore;
use festival_server::utils::jwt::TokenService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    schema::bootstrap(&db)
        .await
        .context("Failed to initialise schema")?;

    let tokens = TokenService::new(&config.auth.jwt_secret).context("Invalid JWT secret")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        store: Arc::new(SqlStore::new(db)),
        tokens,
        config,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

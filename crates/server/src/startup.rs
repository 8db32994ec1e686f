use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use models::db::Database;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {}", server.host, server.port, e)))
}

/// Validate field allow-lists, set up the database once and build the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    models::validate_all().map_err(|e| StartupError::Fields(e.to_string()))?;

    let db = Database::new(cfg.database.clone());
    // One-time connect + migrate before accepting requests
    db.connection().await.map_err(|e| StartupError::Any(e.into()))?;

    Ok(routes::build_router(AppState::new(db), build_cors()))
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(format!("{:#}", e)))?;

    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, event = "listen", "starting http server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

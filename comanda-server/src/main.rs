//! comanda-server — restaurant ordering and management API
//!
//! Long-running HTTP service that:
//! - Manages the order lifecycle (create, cascade status updates, close tables)
//! - Serves the unified catalog (regular menu plus valid specials)
//! - Handles staff authentication (JWT) and sales reports
//! - Stores uploaded dish images in four derived resolutions

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod upload;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comanda_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting comanda-server (env: {})", config.environment);

    // Initialize application state (connects and migrates)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state, &config);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("comanda-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

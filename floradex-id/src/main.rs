//! floradex-id - Plant Identification Web Service
//!
//! Accepts a plant photo upload, identifies candidate species through the
//! Pl@ntNet API, and cross-references selections against the Forest Service
//! invasive-species database and Wikipedia.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use floradex_id::AppState;

const LISTEN_ADDR: &str = "127.0.0.1:5731";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting floradex-id (Plant Identification) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Optional TOML config, then the required API key (ENV -> TOML)
    let toml_config = floradex_common::config::load_config()?;
    let api_key = floradex_id::config::resolve_plantnet_api_key(&toml_config)?;

    // Create application state and router
    let state = AppState::new(api_key)?;
    let app = floradex_id::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    info!("Listening on http://{}", LISTEN_ADDR);
    info!("Health check: http://{}/health", LISTEN_ADDR);

    axum::serve(listener, app).await?;

    Ok(())
}

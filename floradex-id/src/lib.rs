//! floradex-id library interface
//!
//! Exposes the normalization/correlation core and the web surface for
//! integration testing.

pub mod api;
pub mod config;
pub mod correlate;
pub mod error;
pub mod normalize;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::species::SpeciesDetail;
use crate::services::{InvasiveSpeciesClient, Memo, PlantNetClient, WikipediaClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Identification service client
    pub plantnet: Arc<PlantNetClient>,
    /// Invasive-species query client
    pub invasive: Arc<InvasiveSpeciesClient>,
    /// Encyclopedia client
    pub wikipedia: Arc<WikipediaClient>,
    /// In-session memo of per-species detail lookups
    pub detail_memo: Memo<String, SpeciesDetail>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(plantnet_api_key: String) -> floradex_common::Result<Self> {
        let plantnet = PlantNetClient::new(plantnet_api_key)
            .map_err(|e| floradex_common::Error::Internal(e.to_string()))?;
        let invasive = InvasiveSpeciesClient::new()
            .map_err(|e| floradex_common::Error::Internal(e.to_string()))?;
        let wikipedia = WikipediaClient::new()
            .map_err(|e| floradex_common::Error::Internal(e.to_string()))?;

        Ok(Self {
            plantnet: Arc::new(plantnet),
            invasive: Arc::new(invasive),
            wikipedia: Arc::new(wikipedia),
            detail_memo: Memo::new(),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        })
    }

    /// Record the most recent error for the health endpoint
    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::identify_routes())
        .merge(api::species_routes())
        .merge(api::health_routes())
        .with_state(state)
}

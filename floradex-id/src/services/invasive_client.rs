//! Forest Service invasive-species query client
//!
//! Queries the EDW invasive-species ArcGIS layer by exact scientific name.
//! Requests are rate limited to one per second as a courtesy to the shared
//! government endpoint.

use crate::normalize::geometry::EsriGeometry;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

const INVASIVE_QUERY_URL: &str =
    "https://apps.fs.usda.gov/arcx/rest/services/EDW/EDW_InvasiveSpecies_01/MapServer/0/query";

/// Attribute fields requested from the layer, in wire order
const OUT_FIELDS: [&str; 8] = [
    "NRCS_PLANT_CODE",
    "SCIENTIFIC_NAME",
    "COMMON_NAME",
    "PROJECT_CODE",
    "PLANT_STATUS",
    "FS_UNIT_NAME",
    "EXAMINERS",
    "LAST_UPDATE",
];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const RATE_LIMIT_MS: u64 = 1000; // 1 request per second

/// Invasive-species client errors
#[derive(Debug, Error)]
pub enum InvasiveError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Query error {0}: {1}")]
    Query(i64, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Raw query response from the ArcGIS layer
///
/// ArcGIS reports query failures as a 200 response carrying an `error`
/// object, so both shapes live in one struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvasiveQueryResponse {
    #[serde(default)]
    pub features: Vec<InvasiveFeature>,
    pub error: Option<ArcGisError>,
}

/// One feature: loose attribute map plus optional geometry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvasiveFeature {
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
    pub geometry: Option<EsriGeometry>,
}

/// Error object embedded in an otherwise successful ArcGIS response
#[derive(Debug, Clone, Deserialize)]
pub struct ArcGisError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Invasive-species query client
pub struct InvasiveSpeciesClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl InvasiveSpeciesClient {
    pub fn new() -> Result<Self, InvasiveError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| InvasiveError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    /// Query observation records for an exact scientific name
    pub async fn query(&self, scientific_name: &str) -> Result<InvasiveQueryResponse, InvasiveError> {
        self.rate_limiter.wait().await;

        let where_clause = format!(
            "SCIENTIFIC_NAME='{}'",
            scientific_name.replace('\'', "''")
        );

        let out_fields = OUT_FIELDS.join(",");

        debug!(scientific_name = %scientific_name, "Querying invasive-species layer");

        let response = self
            .http_client
            .get(INVASIVE_QUERY_URL)
            .query(&[
                ("where", where_clause.as_str()),
                ("outFields", out_fields.as_str()),
                ("returnGeometry", "true"),
                ("f", "json"),
            ])
            .send()
            .await
            .map_err(|e| InvasiveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InvasiveError::Api(status.as_u16(), error_text));
        }

        let query: InvasiveQueryResponse = response
            .json()
            .await
            .map_err(|e| InvasiveError::Parse(e.to_string()))?;

        if let Some(err) = &query.error {
            return Err(InvasiveError::Query(err.code, err.message.clone()));
        }

        info!(
            scientific_name = %scientific_name,
            features = query.features.len(),
            "Retrieved invasive-species records"
        );

        Ok(query)
    }
}

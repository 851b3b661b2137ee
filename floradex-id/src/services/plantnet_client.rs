//! Pl@ntNet identification API client
//!
//! Posts an uploaded plant image with an organ hint and returns the ranked
//! candidate species list. The API key is forwarded as-is; there is no
//! retry policy, a failed call simply yields an error the handler turns
//! into "no species identified".

use crate::types::Organ;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const PLANTNET_API_URL: &str = "https://my-api.plantnet.org/v2/identify/all";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pl@ntNet client errors
#[derive(Debug, Error)]
pub enum PlantNetError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid image upload: {0}")]
    InvalidImage(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Identification response: ranked candidate list
///
/// Field shapes are contractually loose upstream, so everything nested is
/// optional and defaults apply downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentifyResponse {
    #[serde(default)]
    pub results: Vec<IdentifyResult>,
}

/// One ranked candidate entry
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifyResult {
    pub species: Option<SpeciesInfo>,
    #[serde(default)]
    pub score: f64,
}

/// Species block of a candidate entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesInfo {
    #[serde(rename = "scientificNameWithoutAuthor")]
    pub scientific_name: Option<String>,
    #[serde(rename = "commonNames", default)]
    pub common_names: Vec<String>,
    pub genus: Option<TaxonName>,
    pub family: Option<TaxonName>,
}

/// Genus/family block carrying only the authorless scientific name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonName {
    #[serde(rename = "scientificNameWithoutAuthor")]
    pub scientific_name: Option<String>,
}

/// Pl@ntNet API client
pub struct PlantNetClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl PlantNetClient {
    pub fn new(api_key: String) -> Result<Self, PlantNetError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| PlantNetError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// Identify the plant in an uploaded image
    ///
    /// # Arguments
    /// * `image` - Raw image bytes as uploaded
    /// * `file_name` - Original upload file name
    /// * `mime_type` - Upload content type (e.g., "image/jpeg")
    /// * `organ` - Organ hint for the identification service
    pub async fn identify(
        &self,
        image: Vec<u8>,
        file_name: &str,
        mime_type: &str,
        organ: Organ,
    ) -> Result<IdentifyResponse, PlantNetError> {
        debug!(
            file_name = %file_name,
            organ = %organ,
            bytes = image.len(),
            "Querying Pl@ntNet identification API"
        );

        let part = reqwest::multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| PlantNetError::InvalidImage(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("images", part)
            .text("organs", organ.as_str());

        let url = format!("{}?api-key={}", PLANTNET_API_URL, self.api_key);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PlantNetError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlantNetError::Api(status.as_u16(), error_text));
        }

        let identify: IdentifyResponse = response
            .json()
            .await
            .map_err(|e| PlantNetError::Parse(e.to_string()))?;

        info!(
            candidates = identify.results.len(),
            "Retrieved identification candidates from Pl@ntNet"
        );

        Ok(identify)
    }
}

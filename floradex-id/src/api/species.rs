//! Species detail endpoint
//!
//! For a selected scientific name, assembles the invasive-species tables,
//! the encyclopedia summary, and the sanitized "Invasive species" and
//! "Toxicity" page sections. Detail lookups are memoized for the session so
//! an unrelated UI interaction does not re-query upstream.
//!
//! An invasive-query failure degrades to empty tables plus a warning string;
//! the encyclopedia panel still renders.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::correlate::{self, InvasiveTables};
use crate::error::{ApiError, ApiResult};
use crate::services::wikipedia_client::highlight_toxicity;
use crate::types::EncyclopediaEntry;
use crate::AppState;

const INVASIVE_SECTION_TITLE: &str = "Invasive species";
const TOXICITY_SECTION_TITLE: &str = "Toxicity";

/// Combined per-species detail, as returned by GET /api/species/:name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDetail {
    /// The selected scientific name
    pub scientific_name: String,
    /// Record/point/summary tables from the invasive-species layer
    pub invasive: InvasiveTables,
    /// User-visible warning when the invasive query failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invasive_warning: Option<String>,
    /// Encyclopedia summary, when a page exists
    pub encyclopedia: Option<EncyclopediaEntry>,
    /// Sanitized "Invasive species" page section
    pub invasive_section: Option<String>,
    /// Sanitized, highlight-annotated "Toxicity" page section
    pub toxicity_section: Option<String>,
}

/// GET /api/species/:name
pub async fn species_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<SpeciesDetail>> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Empty scientific name".to_string()));
    }

    let detail = state
        .detail_memo
        .try_get_or_insert_with(name.clone(), || fetch_detail(&state, &name))
        .await?;

    Ok(Json(detail))
}

/// Assemble the detail bundle for one scientific name
async fn fetch_detail(state: &AppState, name: &str) -> Result<SpeciesDetail, ApiError> {
    let (invasive, invasive_warning) = match state.invasive.query(name).await {
        Ok(response) => (correlate::build_invasive_tables(&response), None),
        Err(e) => {
            warn!(scientific_name = %name, error = %e, "Invasive-species query failed");
            state.record_error(e.to_string()).await;
            (
                InvasiveTables::default(),
                Some(format!("Invasive species lookup failed: {}", e)),
            )
        }
    };

    let encyclopedia = match state.wikipedia.summary(name).await {
        Ok(entry) => entry,
        Err(e) => {
            warn!(scientific_name = %name, error = %e, "Encyclopedia summary failed");
            state.record_error(e.to_string()).await;
            None
        }
    };

    // Sections are fetched against the resolved page title when a page
    // exists, the raw name otherwise
    let page_title = encyclopedia
        .as_ref()
        .map(|e| e.title.clone())
        .unwrap_or_else(|| name.to_string());

    let invasive_section = match state
        .wikipedia
        .section(&page_title, INVASIVE_SECTION_TITLE)
        .await
    {
        Ok(section) => section,
        Err(e) => {
            warn!(page = %page_title, error = %e, "Section fetch failed");
            None
        }
    };

    let toxicity_section = match state
        .wikipedia
        .section(&page_title, TOXICITY_SECTION_TITLE)
        .await
    {
        Ok(section) => section.map(|text| highlight_toxicity(&text)),
        Err(e) => {
            warn!(page = %page_title, error = %e, "Section fetch failed");
            None
        }
    };

    Ok(SpeciesDetail {
        scientific_name: name.to_string(),
        invasive,
        invasive_warning,
        encyclopedia,
        invasive_section,
        toxicity_section,
    })
}

/// Build species detail routes
pub fn species_routes() -> Router<AppState> {
    Router::new().route("/api/species/:name", get(species_detail))
}

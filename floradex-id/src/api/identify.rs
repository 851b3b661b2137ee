//! Image identification endpoint
//!
//! Accepts the multipart photo upload and returns the candidate-species
//! table. If the identification call fails, no rows are produced; the page
//! shows "no species identified" instead of partial data.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::correlate;
use crate::error::{ApiError, ApiResult};
use crate::types::{Organ, SpeciesCandidate};
use crate::AppState;

/// Response for POST /api/identify
#[derive(Debug, Serialize)]
pub struct IdentifyResponseBody {
    /// Ranked candidate rows, upstream order
    pub candidates: Vec<SpeciesCandidate>,
}

/// POST /api/identify
///
/// Multipart fields: `image` (the photo) and optional `organ` (defaults to
/// `auto`).
pub async fn identify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<IdentifyResponseBody>> {
    let mut image: Option<(Vec<u8>, String, String)> = None;
    let mut organ = Organ::Auto;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
                image = Some((bytes.to_vec(), file_name, mime_type));
            }
            Some("organ") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read organ: {}", e)))?;
                organ = text.parse().map_err(ApiError::BadRequest)?;
            }
            _ => {}
        }
    }

    let (bytes, file_name, mime_type) =
        image.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Empty image upload".to_string()));
    }

    let response = match state
        .plantnet
        .identify(bytes, &file_name, &mime_type, organ)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Identification request failed");
            state.record_error(e.to_string()).await;
            return Err(ApiError::Upstream(e.to_string()));
        }
    };

    let candidates = correlate::build_species_table(&response);
    if candidates.is_empty() {
        info!("No species identified for upload");
    }

    Ok(Json(IdentifyResponseBody { candidates }))
}

/// Build identification routes
pub fn identify_routes() -> Router<AppState> {
    Router::new().route("/api/identify", post(identify))
}

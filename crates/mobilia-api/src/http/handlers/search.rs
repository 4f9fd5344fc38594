//! Image similarity search and feature-cache administration.

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::json;
use tracing::info;

use mobilia_types::search::RankedProduct;

use crate::http::error::AppError;
use crate::state::AppState;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Check the upload's declared content type and size before any inference
/// work happens.
fn validate_upload(content_type: &str, size: usize, max_bytes: usize) -> Result<(), AppError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::Validation(format!(
            "unsupported image type '{content_type}'; expected one of: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    if size == 0 {
        return Err(AppError::Validation("uploaded image is empty".to_string()));
    }
    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "image exceeds the {max_bytes} byte upload limit"
        )));
    }
    Ok(())
}

/// POST /api/search/image — rank catalog products against an uploaded image.
///
/// Accepts a multipart form with an `image` field. Results below the
/// configured similarity floor are dropped; an empty result set is a 404 so
/// storefront clients can distinguish "nothing similar" from an empty page.
pub async fn image_search(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut top_k = state.config.search.default_top_k;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        match field.name() {
            Some("image") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                upload = Some((content_type, data.to_vec()));
            }
            Some("top_k") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                top_k = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation(format!("invalid top_k '{raw}'")))?;
            }
            _ => {}
        }
    }

    let (content_type, data) =
        upload.ok_or_else(|| AppError::Validation("missing 'image' field".to_string()))?;
    validate_upload(&content_type, data.len(), state.config.search.max_upload_bytes)?;

    // The embedder reads from disk, so the upload lands in a temp file that
    // is removed when this handler returns.
    let temp = tempfile::NamedTempFile::new().map_err(|e| AppError::Internal(e.to_string()))?;
    tokio::fs::write(temp.path(), &data)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let ranked = state
        .feature_cache
        .find_similar_products(temp.path(), top_k)
        .await?;

    let floor = state.config.search.similarity_floor;
    let results: Vec<RankedProduct> = ranked
        .into_iter()
        .filter(|(_, similarity)| *similarity >= floor)
        .map(|(product, similarity)| RankedProduct { product, similarity })
        .collect();

    if results.is_empty() {
        return Err(AppError::NotFound(
            "no visually similar products found".to_string(),
        ));
    }

    Ok(Json(json!({
        "count": results.len(),
        "results": results,
    })))
}

/// POST /api/admin/refresh-features — force a feature cache rebuild.
pub async fn refresh_features(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let products_indexed = state.feature_cache.refresh().await?;
    info!(products_indexed, "feature cache refreshed");
    Ok(Json(json!({ "products_indexed": products_indexed })))
}

use axum::{
    extract::{Path, State},
    Json,
};

use crate::catalog::{sanitize_text, CatalogRecord, CatalogUpdate};
use crate::error::ApiError;
use crate::events::CatalogEvent;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{invalid_payload, read_record};

/// GET /catalogs/:poi
pub async fn get(State(state): State<AppState>, Path(poi): Path<String>) -> ApiResult<CatalogRecord> {
    match state.store.find(&sanitize_text(&poi)).await? {
        Some(raw) => Ok(ApiResponse::success(read_record(raw)?)),
        None => Err(ApiError::not_found(format!("Catalog with location {} not found", poi))),
    }
}

/// PATCH /catalogs/:poi - partial update; absent fields are untouched
pub async fn patch(
    State(state): State<AppState>,
    Path(poi): Path<String>,
    Json(update): Json<CatalogUpdate>,
) -> ApiResult<CatalogRecord> {
    let update = update.sanitized();
    if update.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }
    update.validate().map_err(invalid_payload)?;

    let key = sanitize_text(&poi);
    let raw = state.store.update(&key, update).await?;
    let record = read_record(raw)?;

    tracing::info!("Updated catalog {}", key);
    state.events.publish(CatalogEvent::CatalogUpdated { poi: key });
    Ok(ApiResponse::success(record))
}

/// DELETE /catalogs/:poi
pub async fn delete(State(state): State<AppState>, Path(poi): Path<String>) -> ApiResult<()> {
    let key = sanitize_text(&poi);
    state.store.delete(&key).await?;

    tracing::info!("Deleted catalog {}", key);
    state.events.publish(CatalogEvent::CatalogDeleted { poi: key });
    Ok(ApiResponse::no_content())
}

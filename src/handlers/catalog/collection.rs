use axum::{
    extract::{Query, State},
    Json,
};

use crate::catalog::{CatalogCreate, CatalogRecord};
use crate::error::ApiError;
use crate::events::CatalogEvent;
use crate::filter::CatalogFilter;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{invalid_payload, read_record};

/// GET /catalogs - list records matching the optional filters
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> ApiResult<Vec<CatalogRecord>> {
    let rows = state.store.list(&filter).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No matching catalogs found"));
    }

    let records = rows
        .into_iter()
        .map(read_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiResponse::success(records))
}

/// POST /catalogs - create a record; the poi must not exist yet
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CatalogCreate>,
) -> ApiResult<CatalogRecord> {
    let payload = payload.sanitized();
    payload.validate().map_err(invalid_payload)?;

    let poi = payload.poi.clone();
    let raw = state.store.insert(payload).await?;
    let record = read_record(raw)?;

    tracing::info!("Created catalog {}", poi);
    state.events.publish(CatalogEvent::CatalogCreated { poi });
    Ok(ApiResponse::created(record))
}

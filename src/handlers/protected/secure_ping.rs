use axum::extract::{Extension, State};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::events::CatalogEvent;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SecurePing {
    pub message: &'static str,
    pub user: Claims,
    pub topic: String,
    pub event_id: Uuid,
}

/// GET /secure-catalog-ping - answers only with a valid token and publishes
/// a `secure_ping` event for the caller.
pub async fn secure_ping(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<SecurePing> {
    let event_id = state.events.publish(CatalogEvent::SecurePing { subject: claims.sub.clone() });

    Ok(ApiResponse::success(SecurePing {
        message: "Secure Catalog endpoint OK",
        user: claims,
        topic: state.events.topic().to_string(),
        event_id,
    }))
}

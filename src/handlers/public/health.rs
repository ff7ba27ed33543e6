use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::UdpSocket;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    pub echo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: u16,
    pub status_message: String,
    pub timestamp: String,
    pub ip_address: String,
    pub echo: Option<String>,
    pub path_echo: Option<String>,
    pub database: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> impl IntoResponse {
    make_health(&state, query.echo, None).await
}

/// GET /health/:path_echo
pub async fn health_with_path(
    State(state): State<AppState>,
    Path(path_echo): Path<String>,
    Query(query): Query<HealthQuery>,
) -> impl IntoResponse {
    make_health(&state, query.echo, Some(path_echo)).await
}

async fn make_health(state: &AppState, echo: Option<String>, path_echo: Option<String>) -> impl IntoResponse {
    let (status, status_message, database) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK", "ok".to_string()),
        Err(e) => {
            tracing::warn!("Health check: {} store unavailable: {}", state.store.backend(), e);
            (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED", e.to_string())
        }
    };

    let health = Health {
        status: status.as_u16(),
        status_message: status_message.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        ip_address: local_ip(),
        echo,
        path_echo,
        database,
    };

    (status, Json(json!({ "success": status.is_success(), "data": health })))
}

/// Address of the interface used for outbound traffic. Connecting a UDP
/// socket sends nothing; it only selects a route.
fn local_ip() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::events::spawn_forwarder;
use crate::handlers::{catalog, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full HTTP surface over the given state.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/health/:path_echo", get(public::health_with_path))
        // Catalog records
        .merge(catalog_routes())
        // Protected
        .merge(secure_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/catalogs",
            get(catalog::catalog_list).post(catalog::catalog_create),
        )
        .route(
            "/catalogs/:poi",
            get(catalog::catalog_get)
                .patch(catalog::catalog_patch)
                .delete(catalog::catalog_delete),
        )
}

fn secure_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/secure-catalog-ping", get(protected::secure_ping))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

/// Permissive when no origins are configured; otherwise only the listed ones.
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::permissive()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(false),
    )
}

/// Validate configuration, connect the store, start the event forwarder and
/// serve until the listener fails.
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    tracing::info!("Starting TripSpark Catalog in {:?} mode", config.environment);

    let state = AppState::from_config(config).await?;
    tracing::info!(
        "Catalog store backend: {}, event topic: {}",
        state.store.backend(),
        state.events.topic()
    );
    let _forwarder = spawn_forwarder(&state.events, config.events.webhook_url.clone());

    let app = app(state, &config.security);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("TripSpark Catalog listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

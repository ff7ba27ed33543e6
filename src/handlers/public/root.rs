use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service banner and endpoint index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "TripSpark - Catalog API",
            "version": version,
            "message": "Welcome to the TripSpark - Catalog API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health[/:path_echo]?echo= (public)",
                "catalogs": "/catalogs (GET filtered list, POST create)",
                "catalog": "/catalogs/:poi (GET, PATCH, DELETE)",
                "secure": "/secure-catalog-ping (JWT required, publishes an event)",
            },
            "filters": [
                "city", "country", "rating", "vibes", "budget", "poi",
                "activities", "food", "best_season", "transport", "accessibility"
            ]
        }
    }))
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use tripspark_catalog::auth::{generate_jwt, Claims};
use tripspark_catalog::config::AppConfig;
use tripspark_catalog::database::MemoryCatalogStore;
use tripspark_catalog::events::EventBus;
use tripspark_catalog::server::app;
use tripspark_catalog::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// One in-process server per test, backed by the in-memory store so tests
/// stay isolated and need no database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryCatalogStore>,
    pub events: Arc<EventBus>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_for(&self, sub: &str) -> String {
        generate_jwt(&Claims::new(sub, chrono::Duration::hours(1)), TEST_SECRET).expect("sign token")
    }

    /// POST a catalog and return the response body, asserting 201.
    pub async fn create(&self, payload: Value) -> Result<Value> {
        let res = self.client.post(self.url("/catalogs")).json(&payload).send().await?;
        let status = res.status();
        let body = res.json::<Value>().await?;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        Ok(body)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryCatalogStore::new());
    let events = Arc::new(EventBus::new("catalog-events", 64));
    let state = AppState::new(store.clone(), events.clone(), TEST_SECRET);
    let router = app(state, &AppConfig::development().security);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer { port, base_url, store, events, client: reqwest::Client::new() };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

pub fn paris_fixtures() -> Vec<Value> {
    vec![
        json!({
            "poi": "Eiffel Tower", "city": "Paris", "country": "France",
            "rating": 4.7, "budget": 80, "vibes": "Romantic, Historic",
            "activities": "sightseeing, photography", "best_season": "Spring",
            "transport": "metro", "direction": "Take Line 6 to Bir-Hakeim"
        }),
        json!({
            "poi": "Le Marais", "city": "Paris", "country": "France",
            "rating": 4.4, "budget": 150, "vibes": "lively, artsy",
            "food": "falafel, pastries", "best_season": "summer"
        }),
        json!({
            "poi": "Louvre", "city": "Paris", "country": "France",
            "rating": 4.8, "budget": 40, "vibes": "historic, cultural"
        }),
        json!({
            "poi": "Colosseum", "city": "Rome", "country": "Italy",
            "rating": 4.6, "budget": 30, "vibes": "historic"
        }),
        json!({
            "poi": "Unrated Cafe", "city": "Rome", "country": "Italy",
            "rating": 0, "budget": 0
        }),
    ]
}

pub async fn seed_fixtures(server: &TestServer) -> Result<()> {
    for payload in paris_fixtures() {
        server.create(payload).await?;
    }
    Ok(())
}

/// `poi` values of a successful list response, in response order.
pub fn pois(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r["poi"].as_str().map(str::to_string))
        .collect()
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{CatalogStore, DatabaseManager, MemoryCatalogStore, PgCatalogStore, StoreError};
use crate::events::EventBus;

/// Shared per-request state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub events: Arc<EventBus>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, events: Arc<EventBus>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            events,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Build state from configuration: Postgres when DATABASE_URL is set,
    /// the in-memory store otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn CatalogStore> = match config.database.url {
            Some(_) => {
                let pool = DatabaseManager::connect(&config.database).await?;
                let store = PgCatalogStore::new(pool, config.database.enable_query_logging);
                store.ensure_schema().await?;
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory catalog store");
                Arc::new(MemoryCatalogStore::new())
            }
        };

        Ok(Self::new(
            store,
            Arc::new(EventBus::from_config(&config.events)),
            config.security.jwt_secret.as_str(),
        ))
    }
}

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::catalog::{CatalogCreate, CatalogUpdate, RawRecord};
use crate::database::store::{CatalogStore, StoreError};
use crate::filter::{matches_all, CatalogFilter};

/// In-process catalog store keyed by `poi`. Used for local development
/// without Postgres and by the test suite.
#[derive(Default)]
pub struct MemoryCatalogStore {
    records: RwLock<BTreeMap<String, RawRecord>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw row as-is, bypassing create semantics. Lets tests seed
    /// shapes the create path never produces (e.g. array-valued tags).
    pub async fn seed(&self, record: RawRecord) {
        if let Some(poi) = record.get("poi").and_then(Value::as_str) {
            self.records.write().await.insert(poi.to_string(), record);
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

fn timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339())
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, catalog: CatalogCreate) -> Result<RawRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&catalog.poi) {
            return Err(StoreError::Duplicate(catalog.poi));
        }

        let mut record = match serde_json::to_value(&catalog) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(StoreError::Decode(format!("unexpected record format: {}", other))),
            Err(e) => return Err(StoreError::Decode(e.to_string())),
        };
        let now = timestamp();
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);

        records.insert(catalog.poi, record.clone());
        Ok(record)
    }

    async fn find(&self, poi: &str) -> Result<Option<RawRecord>, StoreError> {
        Ok(self.records.read().await.get(poi).cloned())
    }

    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<RawRecord>, StoreError> {
        let conditions = filter.conditions();
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| matches_all(&conditions, record))
            .cloned()
            .collect())
    }

    async fn update(&self, poi: &str, update: CatalogUpdate) -> Result<RawRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(poi)
            .ok_or_else(|| StoreError::NotFound(poi.to_string()))?;
        for (column, value) in update.changes() {
            record.insert(column, value);
        }
        record.insert("updated_at".to_string(), timestamp());
        Ok(record.clone())
    }

    async fn delete(&self, poi: &str) -> Result<(), StoreError> {
        match self.records.write().await.remove(poi) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(poi.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

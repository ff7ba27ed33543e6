use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{CatalogCreate, CatalogUpdate, RawRecord};
use crate::filter::CatalogFilter;

/// Errors from a catalog store. Not-found and duplicate-key are kept apart
/// from infrastructure failures so the HTTP layer can answer precisely.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Catalog not found: {0}")]
    NotFound(String),

    #[error("Duplicate location: {0}")]
    Duplicate(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
                StoreError::Decode(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Persistent storage for catalog records, addressed by `poi`. Records come
/// back raw; callers normalize them.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Human readable backend name for logs and `/health`
    fn backend(&self) -> &'static str;

    async fn insert(&self, catalog: CatalogCreate) -> Result<RawRecord, StoreError>;

    async fn find(&self, poi: &str) -> Result<Option<RawRecord>, StoreError>;

    /// Records matching every supplied criterion, ordered by `poi`.
    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<RawRecord>, StoreError>;

    async fn update(&self, poi: &str, update: CatalogUpdate) -> Result<RawRecord, StoreError>;

    async fn delete(&self, poi: &str) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub mod manager;
pub mod memory;
pub mod postgres;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;
pub use store::{CatalogStore, StoreError};

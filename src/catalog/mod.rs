pub mod models;
pub mod normalize;
pub mod sanitize;

pub use models::{CatalogCreate, CatalogRecord, CatalogUpdate};
pub use normalize::normalize_record;
pub use sanitize::sanitize_text;

/// A stored row as a flat field -> value mapping, before normalization.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

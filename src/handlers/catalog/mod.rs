pub mod collection;
pub mod record;

use crate::catalog::{normalize_record, CatalogRecord, RawRecord};
use crate::database::StoreError;
use crate::error::ApiError;

// Re-export handler functions for use in routing
pub use collection::create as catalog_create;
pub use collection::list as catalog_list;
pub use record::delete as catalog_delete;
pub use record::get as catalog_get;
pub use record::patch as catalog_patch;

/// Normalize a stored row and read it into the client model.
pub(crate) fn read_record(raw: RawRecord) -> Result<CatalogRecord, ApiError> {
    CatalogRecord::from_raw(normalize_record(raw))
        .map_err(|e| StoreError::Decode(e.to_string()).into())
}

pub(crate) fn invalid_payload(field_errors: std::collections::HashMap<String, String>) -> ApiError {
    ApiError::validation_error("Invalid catalog payload", Some(field_errors))
}

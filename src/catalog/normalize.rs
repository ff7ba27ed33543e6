use serde_json::Value;

use super::RawRecord;

/// Columns holding small tag sets serialized as text.
pub const MULTI_VALUE_FIELDS: [&str; 3] = ["vibes", "activities", "food"];

/// Canonicalize a stored record for clients.
///
/// Multi-value fields that arrive as structured collections (Postgres
/// `text[]` comes back from `row_to_json` as a JSON array) become their
/// elements sorted, de-duplicated and joined with ", ". Flat strings are
/// passed through untouched, so the function is idempotent.
pub fn normalize_record(mut record: RawRecord) -> RawRecord {
    for field in MULTI_VALUE_FIELDS {
        if let Some(value) = record.get_mut(field) {
            if let Value::Array(items) = value {
                let joined = join_sorted(items);
                *value = Value::String(joined);
            }
        }
    }
    record
}

fn join_sorted(items: &[Value]) -> String {
    let mut tags: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();
    tags.sort();
    tags.dedup();
    tags.join(", ")
}

use serde_json::{Map, Value};

use super::types::{Condition, FilterOp};

impl Condition {
    /// Evaluate against a raw record with the same semantics the rendered
    /// SQL has. Missing or null fields never match, as with SQL NULL.
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        match self {
            Condition::AnyOf(group) => group.iter().any(|c| c.matches(record)),
            Condition::Compare { column, op, value } => {
                let Some(field) = record.get(*column).filter(|v| !v.is_null()) else {
                    return false;
                };
                match op {
                    FilterOp::Eq => field == value,
                    FilterOp::Gte => compare_numbers(field, value, |a, b| a >= b),
                    FilterOp::Lte => compare_numbers(field, value, |a, b| a <= b),
                    FilterOp::Contains => match (field.as_str(), value.as_str()) {
                        (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(needle),
                        _ => false,
                    },
                }
            }
        }
    }
}

fn compare_numbers(field: &Value, bound: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (field.as_f64(), bound.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// True when the record satisfies every condition.
pub fn matches_all(conditions: &[Condition], record: &Map<String, Value>) -> bool {
    conditions.iter().all(|c| c.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CatalogFilter;
    use serde_json::json;

    fn record() -> Map<String, Value> {
        json!({
            "poi": "eiffel tower",
            "city": "paris",
            "rating": 4.7,
            "budget": 120,
            "vibes": "romantic, historic",
            "food": null
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn empty_filter_matches_any_record() {
        assert!(matches_all(&CatalogFilter::default().conditions(), &record()));
    }

    #[test]
    fn exact_and_range_conditions() {
        let hit = CatalogFilter { city: Some("PARIS ".into()), rating: Some(4.5), budget: Some(120.0), ..Default::default() };
        assert!(matches_all(&hit.conditions(), &record()));

        let miss = CatalogFilter { budget: Some(0.0), ..Default::default() };
        assert!(!matches_all(&miss.conditions(), &record()));
    }

    #[test]
    fn or_group_matches_any_token() {
        let filter = CatalogFilter { vibes: Some("beach,Historic".into()), ..Default::default() };
        assert!(matches_all(&filter.conditions(), &record()));

        let filter = CatalogFilter { vibes: Some("beach,nightlife".into()), ..Default::default() };
        assert!(!matches_all(&filter.conditions(), &record()));
    }

    #[test]
    fn null_fields_never_match() {
        let filter = CatalogFilter { food: Some("crepes".into()), ..Default::default() };
        assert!(!matches_all(&filter.conditions(), &record()));
    }
}

use crate::catalog::sanitize::sanitize_text;

use super::filter_where::FilterWhere;
use super::types::{CatalogFilter, Condition, FilterOp, SqlResult};

type FilterBuilder = fn(&CatalogFilter) -> Option<Condition>;

/// Every recognized criterion in canonical evaluation order. Compiled
/// predicates list their clauses in exactly this order.
pub const FILTERS: &[(&str, FilterBuilder)] = &[
    ("city", |f| exact("city", f.city.as_deref())),
    ("country", |f| exact("country", f.country.as_deref())),
    ("best_season", |f| exact("best_season", f.best_season.as_deref())),
    ("transport", |f| exact("transport", f.transport.as_deref())),
    ("rating", |f| bound("rating", FilterOp::Gte, f.rating)),
    ("activities", |f| contains("activities", f.activities.as_deref())),
    ("accessibility", |f| contains("accessibility", f.accessibility.as_deref())),
    ("vibes", |f| any_of("vibes", f.vibes.as_deref())),
    ("food", |f| any_of("food", f.food.as_deref())),
    ("budget", |f| bound("budget", FilterOp::Lte, f.budget)),
    ("poi", |f| contains("poi", f.poi.as_deref())),
];

impl CatalogFilter {
    /// Compiled conditions for every supplied criterion, in canonical order.
    pub fn conditions(&self) -> Vec<Condition> {
        FILTERS.iter().filter_map(|(_, build)| build(self)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions().is_empty()
    }
}

/// Compile criteria into a parameterized WHERE predicate. Never fails; no
/// criteria yields `1=1` with no parameters.
pub fn compile_filter(filter: &CatalogFilter) -> SqlResult {
    let result = FilterWhere::generate(&filter.conditions());
    if crate::config::CONFIG.filter.debug_logging {
        tracing::debug!("Compiled filter {:?} into {}", filter, result.query);
    }
    result
}

/// Sanitized text criterion, or `None` when absent or blank.
fn text(value: Option<&str>) -> Option<String> {
    value.map(sanitize_text).filter(|v| !v.is_empty())
}

fn exact(column: &'static str, value: Option<&str>) -> Option<Condition> {
    text(value).map(|v| Condition::compare(column, FilterOp::Eq, v))
}

fn contains(column: &'static str, value: Option<&str>) -> Option<Condition> {
    text(value).map(|v| Condition::compare(column, FilterOp::Contains, v))
}

// Presence is decided by the Option alone: 0 is a real bound.
fn bound(column: &'static str, op: FilterOp, value: Option<f64>) -> Option<Condition> {
    value.map(|v| Condition::compare(column, op, v))
}

fn any_of(column: &'static str, value: Option<&str>) -> Option<Condition> {
    let tokens = split_tokens(value?);
    if tokens.is_empty() {
        return None;
    }
    Some(Condition::AnyOf(
        tokens
            .into_iter()
            .map(|t| Condition::compare(column, FilterOp::Contains, t))
            .collect(),
    ))
}

/// Split a comma list into trimmed, lower-cased, non-empty tokens, keeping
/// the first occurrence of each.
pub fn split_tokens(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in raw.split(',').map(sanitize_text) {
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_criteria_matches_everything() {
        let result = compile_filter(&CatalogFilter::default());
        assert_eq!(result.query, "1=1");
        assert!(result.params.is_empty());
    }

    #[test]
    fn multi_value_tokens_are_deduplicated() {
        let filter = CatalogFilter { vibes: Some("Beach, beach , NATURE".into()), ..Default::default() };
        let result = compile_filter(&filter);
        assert_eq!(result.query, "(\"vibes\" ILIKE $1 OR \"vibes\" ILIKE $2)");
        assert_eq!(result.params, vec![json!("%beach%"), json!("%nature%")]);
    }

    #[test]
    fn empty_multi_value_list_adds_no_clause() {
        let filter = CatalogFilter { food: Some(" , ,, ".into()), ..Default::default() };
        assert!(filter.is_empty());
        assert_eq!(compile_filter(&filter).query, "1=1");
    }

    #[test]
    fn zero_rating_is_supplied() {
        let filter = CatalogFilter { rating: Some(0.0), ..Default::default() };
        let result = compile_filter(&filter);
        assert_eq!(result.query, "\"rating\" >= $1");
        assert_eq!(result.params, vec![json!(0.0)]);
    }

    #[test]
    fn zero_budget_is_supplied() {
        let filter = CatalogFilter { budget: Some(0.0), ..Default::default() };
        assert_eq!(compile_filter(&filter).query, "\"budget\" <= $1");
    }

    #[test]
    fn blank_text_criteria_are_absent() {
        let filter = CatalogFilter { city: Some("   ".into()), poi: Some(String::new()), ..Default::default() };
        assert!(filter.is_empty());
    }

    #[test]
    fn city_vibes_budget_compile_in_canonical_order() {
        let filter = CatalogFilter {
            budget: Some(150.0),
            vibes: Some("romantic,historic".into()),
            city: Some("Paris".into()),
            ..Default::default()
        };
        let result = compile_filter(&filter);
        assert_eq!(
            result.query,
            "\"city\" = $1 AND (\"vibes\" ILIKE $2 OR \"vibes\" ILIKE $3) AND \"budget\" <= $4"
        );
        assert_eq!(result.params, vec![json!("paris"), json!("%romantic%"), json!("%historic%"), json!(150.0)]);
    }

    #[test]
    fn hostile_values_stay_bound() {
        let filter = CatalogFilter { city: Some("'; DROP TABLE x; --".into()), ..Default::default() };
        let result = compile_filter(&filter);
        assert_eq!(result.query, "\"city\" = $1");
        assert!(!result.query.contains("DROP"));
        assert_eq!(result.params, vec![json!("'; drop table x; --")]);
    }

    #[test]
    fn all_criteria_follow_registry_order() {
        let filter = CatalogFilter {
            city: Some("paris".into()),
            country: Some("france".into()),
            rating: Some(4.0),
            vibes: Some("romantic".into()),
            budget: Some(200.0),
            poi: Some("tower".into()),
            activities: Some("hiking".into()),
            food: Some("crepes".into()),
            best_season: Some("spring".into()),
            transport: Some("metro".into()),
            accessibility: Some("wheelchair".into()),
        };
        let result = compile_filter(&filter);
        let columns: Vec<&str> = FILTERS.iter().map(|(name, _)| *name).collect();
        let mut last = 0;
        for column in columns {
            let pos = result.query.find(&format!("\"{}\"", column)).expect("column present");
            assert!(pos >= last, "{} out of order in {}", column, result.query);
            last = pos;
        }
        assert_eq!(result.params.len(), 11);
    }

    #[test]
    fn substring_filters_are_lowercased_and_wrapped() {
        let filter = CatalogFilter { activities: Some("  Hiking ".into()), ..Default::default() };
        let result = compile_filter(&filter);
        assert_eq!(result.query, "\"activities\" ILIKE $1");
        assert_eq!(result.params, vec![json!("%hiking%")]);
    }
}

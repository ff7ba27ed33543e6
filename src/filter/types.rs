use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search criteria accepted by `GET /catalogs`. Every entry is optional and
/// independent of the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub city: Option<String>,
    pub country: Option<String>,
    /// Minimum rating, inclusive
    #[serde(alias = "rating_avg")]
    pub rating: Option<f64>,
    /// Comma-separated; matches any listed vibe
    pub vibes: Option<String>,
    /// Maximum budget, inclusive
    pub budget: Option<f64>,
    pub poi: Option<String>,
    pub activities: Option<String>,
    /// Comma-separated; matches any listed food
    pub food: Option<String>,
    pub best_season: Option<String>,
    pub transport: Option<String>,
    pub accessibility: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    /// Case-insensitive substring
    Contains,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::Contains => "ILIKE",
        }
    }
}

/// One compiled criterion. `AnyOf` is an OR-group of comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: &'static str,
        op: FilterOp,
        value: Value,
    },
    AnyOf(Vec<Condition>),
}

impl Condition {
    pub fn compare(column: &'static str, op: FilterOp, value: impl Into<Value>) -> Self {
        Condition::Compare { column, op, value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

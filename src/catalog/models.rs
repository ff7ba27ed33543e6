use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const SPENDING_LEVELS: [&str; 3] = ["low", "medium", "high"];
pub const MAX_RATING: f64 = 5.0;

/// Creation payload for `POST /catalogs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCreate {
    pub poi: String,
    pub city: String,
    pub country: String,
    pub currency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub spending: Option<String>,
    pub budget: Option<i64>,
    pub vibes: Option<String>,
    pub activities: Option<String>,
    pub food: Option<String>,
    pub best_season: Option<String>,
    pub trip_days: Option<i64>,
    pub nearest_airport: Option<String>,
    pub transport: Option<String>,
    pub accessibility: Option<String>,
    pub direction: Option<String>,
}

/// Partial update payload for `PATCH /catalogs/:poi`. Absent fields are left
/// untouched; the identifier cannot be changed.
///
/// Optional columns are tri-state: absent (`None`), explicit `null`
/// (`Some(None)`, clears the column) or a value. `city` and `country` are
/// required columns, so a `null` there is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub currency: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub spending: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub budget: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub vibes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub activities: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub food: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub best_season: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub trip_days: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub nearest_airport: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub transport: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub direction: Option<Option<String>>,
}

/// Keeps an explicit `null` apart from a missing field.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CatalogUpdate {
    /// Supplied fields as column -> value, ordered by column name. Cleared
    /// columns map to `Value::Null`.
    pub fn changes(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }
}

/// Catalog record as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub poi: String,
    pub city: String,
    pub country: String,
    pub currency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub spending: Option<String>,
    pub budget: Option<i64>,
    pub vibes: Option<String>,
    pub activities: Option<String>,
    pub food: Option<String>,
    pub best_season: Option<String>,
    pub trip_days: Option<i64>,
    pub nearest_airport: Option<String>,
    pub transport: Option<String>,
    pub accessibility: Option<String>,
    pub direction: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogRecord {
    pub fn from_raw(raw: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(raw))
    }
}

/// Range and enum checks shared by create and update. Expects sanitized input.
fn check_fields(
    rating: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    spending: Option<&str>,
    budget: Option<i64>,
    trip_days: Option<i64>,
) -> Result<(), HashMap<String, String>> {
    let mut errors = HashMap::new();
    if let Some(r) = rating {
        if !(0.0..=MAX_RATING).contains(&r) {
            errors.insert("rating".to_string(), format!("must be between 0 and {}", MAX_RATING));
        }
    }
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            errors.insert("latitude".to_string(), "must be between -90 and 90".to_string());
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            errors.insert("longitude".to_string(), "must be between -180 and 180".to_string());
        }
    }
    if let Some(level) = spending {
        if !SPENDING_LEVELS.contains(&level) {
            errors.insert("spending".to_string(), format!("must be one of {}", SPENDING_LEVELS.join(", ")));
        }
    }
    if budget.is_some_and(|b| b < 0) {
        errors.insert("budget".to_string(), "must not be negative".to_string());
    }
    if trip_days.is_some_and(|d| d < 0) {
        errors.insert("trip_days".to_string(), "must not be negative".to_string());
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

impl CatalogCreate {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = match check_fields(
            self.rating,
            self.latitude,
            self.longitude,
            self.spending.as_deref(),
            self.budget,
            self.trip_days,
        ) {
            Ok(()) => HashMap::new(),
            Err(errors) => errors,
        };
        if self.poi.is_empty() {
            errors.insert("poi".to_string(), "must not be empty".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl CatalogUpdate {
    /// Cleared columns have nothing to check.
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        check_fields(
            self.rating.flatten(),
            self.latitude.flatten(),
            self.longitude.flatten(),
            self.spending.as_ref().and_then(|s| s.as_deref()),
            self.budget.flatten(),
            self.trip_days.flatten(),
        )
    }
}

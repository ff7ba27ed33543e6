use super::models::{CatalogCreate, CatalogUpdate};

/// Canonical stored form of free text: surrounding whitespace removed,
/// lower-cased. Lookups and exact-match filters rely on this.
pub fn sanitize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

fn sanitize_opt(value: Option<String>) -> Option<String> {
    value.map(|v| sanitize_text(&v))
}

fn sanitize_nullable(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(sanitize_opt)
}

impl CatalogCreate {
    /// Sanitize every free-text field. `direction` is a URL and is stored as given.
    pub fn sanitized(self) -> Self {
        Self {
            poi: sanitize_text(&self.poi),
            city: sanitize_text(&self.city),
            country: sanitize_text(&self.country),
            currency: sanitize_opt(self.currency),
            description: sanitize_opt(self.description),
            spending: sanitize_opt(self.spending),
            vibes: sanitize_opt(self.vibes),
            activities: sanitize_opt(self.activities),
            food: sanitize_opt(self.food),
            best_season: sanitize_opt(self.best_season),
            nearest_airport: sanitize_opt(self.nearest_airport),
            transport: sanitize_opt(self.transport),
            accessibility: sanitize_opt(self.accessibility),
            ..self
        }
    }
}

impl CatalogUpdate {
    /// Sanitize every string field present in the payload. Cleared fields stay cleared.
    pub fn sanitized(self) -> Self {
        Self {
            city: sanitize_opt(self.city),
            country: sanitize_opt(self.country),
            currency: sanitize_nullable(self.currency),
            description: sanitize_nullable(self.description),
            spending: sanitize_nullable(self.spending),
            vibes: sanitize_nullable(self.vibes),
            activities: sanitize_nullable(self.activities),
            food: sanitize_nullable(self.food),
            best_season: sanitize_nullable(self.best_season),
            nearest_airport: sanitize_nullable(self.nearest_airport),
            transport: sanitize_nullable(self.transport),
            accessibility: sanitize_nullable(self.accessibility),
            direction: sanitize_nullable(self.direction),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(value: serde_json::Value) -> CatalogCreate {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn sanitize_text_trims_and_lowercases() {
        assert_eq!(sanitize_text("  Lively Spot  "), "lively spot");
        assert_eq!(sanitize_text("\tPARIS\n"), "paris");
        assert_eq!(sanitize_text("   "), "");
    }

    #[test]
    fn create_sanitizes_text_but_keeps_direction_as_given() {
        let payload = create(json!({
            "poi": " Times Square ",
            "city": "New York City",
            "country": "USA",
            "description": "  Lively Spot  ",
            "vibes": "Busy, Urban",
            "rating": 4.5,
            "direction": " https://Maps.example.com/TS "
        }))
        .sanitized();
        assert_eq!(payload.poi, "times square");
        assert_eq!(payload.city, "new york city");
        assert_eq!(payload.description.as_deref(), Some("lively spot"));
        assert_eq!(payload.vibes.as_deref(), Some("busy, urban"));
        assert_eq!(payload.rating, Some(4.5));
        assert_eq!(payload.direction.as_deref(), Some(" https://Maps.example.com/TS "));
    }

    #[test]
    fn update_sanitizes_every_present_string() {
        let update = CatalogUpdate {
            city: Some(" Seattle ".into()),
            direction: Some(Some("HTTPS://X".into())),
            description: Some(None),
            budget: Some(Some(80)),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(update.city.as_deref(), Some("seattle"));
        assert_eq!(update.direction, Some(Some("https://x".to_string())));
        assert_eq!(update.description, Some(None));
        assert_eq!(update.budget, Some(Some(80)));
        assert!(update.country.is_none());
    }
}

use serde_json::Value;

use super::types::{Condition, FilterOp, SqlResult};

/// Renders compiled conditions into a Postgres predicate with `$n`
/// placeholders. Placeholder numbers are assigned as values are bound, so the
/// n-th placeholder always refers to `params[n - 1]`.
pub struct FilterWhere {
    param_values: Vec<Value>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self { param_values: vec![] }
    }

    pub fn generate(conditions: &[Condition]) -> SqlResult {
        let mut filter_where = Self::new();
        filter_where.build(conditions)
    }

    pub fn generate_empty() -> SqlResult {
        SqlResult { query: "1=1".to_string(), params: vec![] }
    }

    fn build(&mut self, conditions: &[Condition]) -> SqlResult {
        if conditions.is_empty() {
            return Self::generate_empty();
        }
        let sql_conditions: Vec<String> = conditions
            .iter()
            .map(|condition| self.build_sql_condition(condition))
            .collect();
        SqlResult {
            query: sql_conditions.join(" AND "),
            params: std::mem::take(&mut self.param_values),
        }
    }

    fn build_sql_condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Compare { column, op, value } => {
                let bound = match op {
                    FilterOp::Contains => Value::String(like_pattern(value.as_str().unwrap_or_default())),
                    _ => value.clone(),
                };
                format!("\"{}\" {} {}", column, op.to_sql(), self.param(bound))
            }
            Condition::AnyOf(group) => {
                let parts: Vec<String> = group.iter().map(|c| self.build_sql_condition(c)).collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

impl Default for FilterWhere {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a token for substring matching, escaping LIKE metacharacters so the
/// token is always matched literally.
pub fn like_pattern(token: &str) -> String {
    let mut pattern = String::with_capacity(token.len() + 2);
    pattern.push('%');
    for c in token.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_conditions_render_true_predicate() {
        let result = FilterWhere::generate(&[]);
        assert_eq!(result.query, "1=1");
        assert!(result.params.is_empty());
    }

    #[test]
    fn placeholders_follow_bind_order_through_groups() {
        let conditions = vec![
            Condition::compare("city", FilterOp::Eq, "paris"),
            Condition::AnyOf(vec![
                Condition::compare("vibes", FilterOp::Contains, "romantic"),
                Condition::compare("vibes", FilterOp::Contains, "historic"),
            ]),
            Condition::compare("budget", FilterOp::Lte, 150.0),
        ];
        let result = FilterWhere::generate(&conditions);
        assert_eq!(
            result.query,
            "\"city\" = $1 AND (\"vibes\" ILIKE $2 OR \"vibes\" ILIKE $3) AND \"budget\" <= $4"
        );
        assert_eq!(result.params, vec![json!("paris"), json!("%romantic%"), json!("%historic%"), json!(150.0)]);
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("beach"), "%beach%");
        assert_eq!(like_pattern("100%_off\\"), "%100\\%\\_off\\\\%");
    }
}

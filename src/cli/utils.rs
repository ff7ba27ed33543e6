use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Parse a `key=value` pair given on the command line. Values that parse as
/// JSON are kept typed; anything else becomes a string.
pub fn parse_key_value(input: &str) -> anyhow::Result<(String, Value)> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected key=value, got '{}'", input))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow::anyhow!("empty claim name in '{}'", input));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_and_plain_values() {
        assert_eq!(parse_key_value("role=admin").unwrap(), ("role".to_string(), json!("admin")));
        assert_eq!(parse_key_value("level=3").unwrap(), ("level".to_string(), json!(3)));
        assert_eq!(parse_key_value("beta=true").unwrap(), ("beta".to_string(), json!(true)));
    }

    #[test]
    fn rejects_missing_separator_and_empty_key() {
        assert!(parse_key_value("role").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}

use chrono::{Duration, Utc};
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::{output_success, parse_key_value};
use crate::cli::OutputFormat;
use crate::config::config;

/// Claims the token sets itself; `--claim` may not override them.
const RESERVED_CLAIMS: [&str; 3] = ["sub", "exp", "iat"];

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[arg(long, default_value = "local-dev", help = "Subject claim")]
    pub sub: String,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,

    #[arg(long = "claim", help = "Extra claim as key=value, repeatable")]
    pub claims: Vec<String>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config();
    let ttl = lifetime(args.hours.unwrap_or(config.security.jwt_expiry_hours))?;

    let mut claims = Claims::new(args.sub, ttl);
    for raw in &args.claims {
        let (key, value) = parse_key_value(raw)?;
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return Err(anyhow::anyhow!("'{}' is set by the token itself; use --sub or --hours", key));
        }
        claims.extra.insert(key, value);
    }

    let token = generate_jwt(&claims, &config.security.jwt_secret)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            &output_format,
            "Token generated",
            Some(json!({ "token": token, "expires_at": claims.exp })),
        )?,
    }
    Ok(())
}

/// Token lifetime, rejecting values whose expiry would not fit in a timestamp.
fn lifetime(hours: u64) -> anyhow::Result<Duration> {
    let too_long = || anyhow::anyhow!("--hours {} is too large", hours);

    let ttl = i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .ok_or_else(too_long)?;
    Utc::now().checked_add_signed(ttl).ok_or_else(too_long)?;
    Ok(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_accepts_normal_values() {
        assert_eq!(lifetime(24).unwrap(), Duration::hours(24));
        assert_eq!(lifetime(0).unwrap(), Duration::zero());
    }

    #[test]
    fn lifetime_rejects_overflowing_values() {
        assert!(lifetime(u64::MAX).is_err());
        assert!(lifetime(i64::MAX as u64 / 3600).is_err());
    }

    #[test]
    fn reserved_claims_cannot_be_overridden() {
        for key in ["sub", "exp", "iat"] {
            let args = TokenArgs {
                sub: "alice".into(),
                hours: Some(1),
                claims: vec![format!("{}=x", key)],
            };
            let err = handle(args, OutputFormat::Text).unwrap_err();
            assert!(err.to_string().contains(key), "unexpected error: {}", err);
        }
    }
}

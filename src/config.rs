use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_TTL_MINUTES: i64 = 60;
/// One year. Longer lifetimes are refused at startup.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs((self.ttl_minutes.max(0) as u64).saturating_mul(60))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres URL. `None` keeps users in process memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        anyhow::ensure!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let jwt = JwtConfig {
            secret,
            ttl_minutes: ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())
                .context("invalid JWT_TTL_MINUTES")?,
        };

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => 3000,
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            jwt,
        })
    }
}

/// Unset, unparsable or non-positive values fall back to the default.
fn ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(minutes) = raw
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
    else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    anyhow::ensure!(
        minutes <= MAX_TTL_MINUTES,
        "token lifetime of {minutes} minutes exceeds the {MAX_TTL_MINUTES} minute maximum"
    );
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_converts_minutes() {
        let jwt = JwtConfig {
            secret: "s".into(),
            ttl_minutes: 90,
        };
        assert_eq!(jwt.ttl(), Duration::from_secs(90 * 60));
    }

    #[test]
    fn negative_ttl_clamps_to_zero() {
        let jwt = JwtConfig {
            secret: "s".into(),
            ttl_minutes: -5,
        };
        assert_eq!(jwt.ttl(), Duration::ZERO);
    }

    #[test]
    fn huge_ttl_saturates_instead_of_overflowing() {
        let jwt = JwtConfig {
            secret: "s".into(),
            ttl_minutes: i64::MAX,
        };
        assert_eq!(jwt.ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn ttl_minutes_defaults_when_unset_or_unusable() {
        for raw in [None, Some(""), Some("soon"), Some("0"), Some("-30")] {
            assert_eq!(ttl_minutes(raw).unwrap(), DEFAULT_TTL_MINUTES, "raw = {raw:?}");
        }
        assert_eq!(ttl_minutes(Some(" 15 ")).unwrap(), 15);
        assert_eq!(ttl_minutes(Some("525600")).unwrap(), MAX_TTL_MINUTES);
    }

    #[test]
    fn ttl_minutes_above_one_year_is_refused() {
        let err = ttl_minutes(Some("525601")).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");
        assert!(ttl_minutes(Some("9223372036854775807")).is_err());
    }
}

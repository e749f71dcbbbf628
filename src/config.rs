// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Maximum number of attempts kept per (user, quiz) pair.
pub const DEFAULT_HISTORY_CAP: usize = 10;

/// Number of attempts returned by the "recent attempts" view.
pub const RECENT_ATTEMPTS_LIMIT: i64 = 10;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
    /// Retention cap applied when recording attempt history.
    pub history_cap: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        let history_cap = match env::var("ATTEMPT_HISTORY_CAP") {
            Ok(raw) => parse_history_cap(&raw)?,
            Err(_) => DEFAULT_HISTORY_CAP,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
            history_cap,
        })
    }
}

fn parse_history_cap(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(cap) if cap >= 1 => Ok(cap),
        _ => Err(ConfigError::Invalid {
            key: "ATTEMPT_HISTORY_CAP",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_cap_must_be_positive() {
        assert_eq!(parse_history_cap("10").unwrap(), 10);
        assert_eq!(parse_history_cap(" 3 ").unwrap(), 3);
        assert!(parse_history_cap("0").is_err());
        assert!(parse_history_cap("-1").is_err());
        assert!(parse_history_cap("ten").is_err());
    }
}

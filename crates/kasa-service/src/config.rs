//! # Service Configuration
//!
//! Environment-driven configuration for the service facade. Every knob has a
//! development default so `Config::load()` succeeds on a bare machine.

use std::env;

use thiserror::Error;

/// Default database file, relative to the working directory.
const DEFAULT_DATABASE_PATH: &str = "kasa.db";

/// Development-only signing secret. Deployments must set `JWT_SECRET`.
const DEFAULT_JWT_SECRET: &str = "kasa-dev-secret-change-me";

/// Default token lifetime: 24 hours.
const DEFAULT_JWT_LIFETIME_SECS: i64 = 86_400;

/// Default connection pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Service configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file (`DATABASE_PATH`).
    pub database_path: String,
    /// HMAC secret for JWT signing (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Token lifetime in seconds (`JWT_LIFETIME_SECS`).
    pub jwt_lifetime_secs: i64,
    /// Connection pool size (`DB_MAX_CONNECTIONS`).
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from the environment, falling back to development
    /// defaults for anything unset.
    pub fn load() -> Result<Self, ConfigError> {
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using development default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let jwt_lifetime_secs = parse_env("JWT_LIFETIME_SECS", DEFAULT_JWT_LIFETIME_SECS)?;
        if jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "JWT_LIFETIME_SECS".to_string(),
                value: jwt_lifetime_secs.to_string(),
            });
        }

        let max_connections = parse_env("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DB_MAX_CONNECTIONS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Config {
            database_path,
            jwt_secret,
            jwt_lifetime_secs,
            max_connections,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_lifetime_secs: DEFAULT_JWT_LIFETIME_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

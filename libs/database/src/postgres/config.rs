use core_config::{env_or_default, env_required, ConfigError, FromEnv};
use sea_orm::ConnectOptions;
use std::time::Duration;

/// PostgreSQL connection configuration.
///
/// Loaded from environment variables:
/// - `DATABASE_URL` (required)
/// - `DATABASE_MAX_CONNECTIONS` (default 20)
/// - `DATABASE_MIN_CONNECTIONS` (default 2)
/// - `DATABASE_CONNECT_TIMEOUT_SECS` (default 8)
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout_secs: 8,
        }
    }

    /// Convert into SeaORM connection options with pool settings applied.
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url);
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(true);
        options
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: format!("{}", e),
        })
}

impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "20")?,
            min_connections: parse_env("DATABASE_MIN_CONNECTIONS", "2")?,
            connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", "8")?,
        })
    }
}

//! Token-signing configuration.
//!
//! An explicit struct loaded once at startup and handed to [`crate::auth::JwtAuth`]
//! at construction — signing settings are never read from ambient state.

use core_config::{env_or_default, env_required, ConfigError, FromEnv};
use jsonwebtoken::Algorithm;
use std::str::FromStr;

/// JWT signing configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required, minimum 32 characters)
/// - `JWT_ALGORITHM` (default `HS256`; HMAC family only)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES` (default 30)
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub token_expiry_minutes: i64,
}

impl AuthConfig {
    /// Manual construction, primarily for tests.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            algorithm: Algorithm::HS256,
            token_expiry_minutes: 30,
        }
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let algorithm_name = env_or_default("JWT_ALGORITHM", "HS256");
        let algorithm =
            Algorithm::from_str(&algorithm_name).map_err(|_| ConfigError::ParseError {
                key: "JWT_ALGORITHM".to_string(),
                details: format!("unknown algorithm '{}'", algorithm_name),
            })?;

        // Secret-keyed signing only; asymmetric algorithms would need key files.
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::ParseError {
                key: "JWT_ALGORITHM".to_string(),
                details: format!("'{}' is not an HMAC algorithm", algorithm_name),
            });
        }

        let token_expiry_minutes = env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "30")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            secret,
            algorithm,
            token_expiry_minutes,
        })
    }
}

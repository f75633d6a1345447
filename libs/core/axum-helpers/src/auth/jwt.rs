use super::config::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure.
///
/// The token carries only the subject identity; role flags are
/// re-fetched from the user directory on every request and never
/// trusted from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl Claims {
    /// The subject parsed as a user id.
    pub fn user_id(&self) -> eyre::Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| eyre::eyre!("Invalid token subject: {}", e))
    }
}

/// Stateless JWT issuance and verification.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    algorithm: jsonwebtoken::Algorithm,
    token_expiry: Duration,
}

impl JwtAuth {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            algorithm: config.algorithm,
            token_expiry: Duration::minutes(config.token_expiry_minutes),
        }
    }

    /// Create a signed, time-limited access token for the given user.
    pub fn issue_token(&self, user_id: Uuid) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_expiry).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header {
            alg: self.algorithm,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify_token(&self, token: &str) -> eyre::Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(self.algorithm),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&AuthConfig::new("test-secret-that-is-long-enough-0123"))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth.issue_token(user_id).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let auth = auth();
        let token = auth.issue_token(Uuid::now_v7()).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(auth.verify_token(&tampered).is_err());
    }

    #[test]
    fn test_verify_rejects_token_from_other_secret() {
        let token = auth().issue_token(Uuid::now_v7()).unwrap();

        let other = JwtAuth::new(&AuthConfig::new("another-secret-that-is-long-enough!!"));
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let mut config = AuthConfig::new("test-secret-that-is-long-enough-0123");
        config.token_expiry_minutes = -5;
        let auth = JwtAuth::new(&config);

        let token = auth.issue_token(Uuid::now_v7()).unwrap();
        assert!(auth.verify_token(&token).is_err());
    }
}

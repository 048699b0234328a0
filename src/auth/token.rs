use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// How long an issued token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 1;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Username of the token holder.
    pub username: String,
    /// Id of the token holder.
    pub id: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies HS256 JWTs with a single shared secret.
///
/// One instance is built from `Config` at startup and shared through `web::Data`, so
/// the secret is read once instead of on every request.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Builds an issuer whose tokens live for `ttl`. A negative `ttl` yields tokens
    /// that are already expired, which is how tests simulate expiry.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        // Expiry is exact: no clock leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Issues a token bound to `{username, id}`.
    ///
    /// # Returns
    /// The encoded JWT, or `AppError::Internal` if encoding fails.
    pub fn issue(&self, username: &str, id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// Every failure, whether malformed input, a bad signature or an expired token,
    /// becomes `AppError::InvalidToken` so clients cannot tell them apart.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected bearer token: {}", e);
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_verification() {
        let issuer = TokenIssuer::new("test_secret_for_gen_verify");
        let id = Uuid::new_v4();
        let token = issuer.issue("alice1", id).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.username, "alice1");
        assert_eq!(claims.id, id);
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test_log::test]
    fn test_token_expiration() {
        let expired = TokenIssuer::with_ttl("test_secret_for_expiration", Duration::hours(-2));
        let token = expired.issue("alice1", Uuid::new_v4()).unwrap();

        let issuer = TokenIssuer::new("test_secret_for_expiration");
        assert!(matches!(issuer.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_token_expired_seconds_ago() {
        let expired = TokenIssuer::with_ttl("test_secret_for_expiration", Duration::seconds(-5));
        let token = expired.issue("alice1", Uuid::new_v4()).unwrap();

        let issuer = TokenIssuer::new("test_secret_for_expiration");
        assert!(matches!(issuer.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = TokenIssuer::new("one_secret")
            .issue("alice1", Uuid::new_v4())
            .unwrap();
        let issuer = TokenIssuer::new("a_completely_different_secret");
        assert!(matches!(issuer.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token() {
        let issuer = TokenIssuer::new("secret");
        assert!(matches!(issuer.verify("not-a-jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(issuer.verify(""), Err(AppError::InvalidToken)));
    }
}

//! Session token service
//!
//! Issues and verifies signed, time-limited session tokens (JWT, HS256).
//! Tokens are self-contained: no session row is stored anywhere, and a
//! token is valid iff its signature checks out against the configured
//! secret and it has not expired. Expiry is checked with zero leeway.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Claims embedded in every token issued by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Standard JWT subject, set to the username
    pub sub: String,
    /// Numeric user ID (matches users.id)
    pub user_id: i64,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

/// Error types for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token is past its expiry
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, malformed token, or wrong algorithm
    #[error("Invalid token")]
    Invalid,

    /// Signing failed (should not happen with a valid secret)
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Stateless session token service
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    token_ttl_hours: i64,
}

impl TokenService {
    /// Create a new token service with the given secret and lifetime
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_hours,
        }
    }

    /// Create a token service from the authentication configuration
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.secret.clone(), config.token_ttl_hours)
    }

    /// Issue a signed token for the given user.
    ///
    /// The token carries the user identity and expires `token_ttl_hours`
    /// from now. Signing is CPU-bound; there are no side effects.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: username.to_string(),
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Fails if the signature does not verify against the service secret,
    /// the token is malformed, or the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(data.claims)
    }
}

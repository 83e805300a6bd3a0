//! JWT token utilities using the HS256 algorithm.
//!
//! Session tokens are signed with a single shared secret. Every token carries
//! `iat` and `exp` next to the caller's claims; claims are serialized as UTF-8
//! JSON and base64url encoded by `jsonwebtoken`, so non-ASCII names survive
//! the round trip.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims wrapped with the issued-at and expiry timestamps (Unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamped<C> {
    #[serde(flatten)]
    pub claims: C,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by an enterprise session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (enterprise ID)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub company: String,
}

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Session token expiration in seconds
    pub session_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("session_expiry_secs", &self.session_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new JwtConfig from a shared HMAC secret, with no leeway.
    pub fn new(secret: &str, session_expiry_secs: i64) -> Result<Self, JwtError> {
        Self::with_leeway(secret, session_expiry_secs, 0)
    }

    /// Creates a new JwtConfig with custom clock skew tolerance.
    pub fn with_leeway(
        secret: &str,
        session_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("JWT secret must not be empty".into()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_expiry_secs,
            leeway_secs,
        })
    }

    /// Signs `claims` with `iat = now` and `exp = now + ttl_secs`.
    pub fn sign<C: Serialize>(&self, claims: &C, ttl_secs: i64) -> Result<String, JwtError> {
        let iat = Utc::now().timestamp();
        let payload = Stamped {
            claims,
            iat,
            exp: iat + ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates signature and expiry, returning the claims with their timestamps.
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<Stamped<C>, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data =
            decode::<Stamped<C>>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                    _ => JwtError::DecodingError(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Issues a session token with the configured lifetime.
    pub fn issue_session(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        self.sign(claims, self.session_expiry_secs)
    }

    /// Validates a session token.
    pub fn verify_session(&self, token: &str) -> Result<Stamped<SessionClaims>, JwtError> {
        self.verify(token)
    }
}

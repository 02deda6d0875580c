//! JWT session tokens
//! Stateless: a token is valid iff its signature verifies and it has not expired

use crate::auth::models::Claims;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a presented token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("token has no usable subject")]
    MissingSubject,
}

/// Issues and validates signed session tokens
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Configured lifetime of newly issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, self.ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: Some(user_id.to_string()),
            exp: now.timestamp().saturating_add(ttl_secs),
            iat: Some(now.timestamp()),
        };

        debug!(user_id, exp = claims.exp, "issuing session token");

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
    }

    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // expiry is checked below against `now`, with no leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let decoded =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= decoded.claims.exp {
            return Err(TokenError::Expired);
        }

        decoded
            .claims
            .sub
            .as_deref()
            .and_then(|sub| sub.parse::<i64>().ok())
            .ok_or(TokenError::MissingSubject)
    }
}

//! # Session tokens — HS256-signed JWTs
//!
//! Tokens are stateless: validity is the signature plus the embedded expiry, never a
//! lookup. The claim set is the strongly typed [`Claims`]; any token whose payload
//! does not deserialize into it is rejected as [`TokenError::Invalid`].
//!
//! Expiry is checked against this process's clock with zero leeway.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use store::UserId;
use thiserror::Error;

use super::config::TokenConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Bad signature, unexpected algorithm, or malformed token.
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("missing token")]
    Missing,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub sub: UserId,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(config.secret()),
            decoding: DecodingKey::from_secret(config.secret()),
            validation,
            ttl: config.ttl,
        }
    }

    /// Issue a token for `user_id` expiring one TTL from now.
    pub fn issue(&self, user_id: UserId) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            Error::Internal
        })
    }

    /// Validate a token and return the user it was issued to.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

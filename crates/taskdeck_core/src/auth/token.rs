//! Signed access/refresh token issuance and validation.
//!
//! # Responsibility
//! - Issue HS256 tokens carrying the subject id and an absolute expiry.
//! - Validate tokens back to a subject id.
//!
//! # Invariants
//! - Bad signature, malformed payload, non-numeric subject and past expiry
//!   all collapse to the same `TokenError::Invalid`; callers learn nothing
//!   about which check failed.
//! - There is no revocation list; a token is valid until natural expiry.

use crate::config::CoreConfig;
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Token payload: subject id (string-encoded) and absolute expiry seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

/// Token issuance/validation errors.
#[derive(Debug)]
pub enum TokenError {
    /// Token failed validation; deliberately carries no detail.
    Invalid,
    /// Token could not be signed at issue time.
    Encode(jsonwebtoken::errors::Error),
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid => write!(f, "invalid or expired token"),
            Self::Encode(err) => write!(f, "token signing failed: {err}"),
        }
    }
}

impl Error for TokenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid => None,
            Self::Encode(err) => Some(err),
        }
    }
}

/// Issues and validates signed bearer tokens.
pub struct TokenService {
    secret: String,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            secret: config.token_secret.clone(),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Issues a short-lived access token for `subject_id`.
    pub fn issue_access(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(subject_id, self.access_ttl_secs)
    }

    /// Issues a long-lived refresh token for `subject_id`.
    pub fn issue_refresh(&self, subject_id: i64) -> Result<String, TokenError> {
        self.issue(subject_id, self.refresh_ttl_secs)
    }

    /// Validates a token and returns its subject id.
    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Zero leeway: a token expiring now is expired now.
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| TokenError::Invalid)?;

        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }

    fn issue(&self, subject_id: i64, ttl_secs: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject_id.to_string(),
            exp: get_current_timestamp() + ttl_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Encode)
    }
}

//! Immutable core configuration.
//!
//! # Invariants
//! - Built once at startup and passed by reference to the token service and
//!   identity resolver; there is no process-wide mutable settings object.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default access-token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 15 * 60;
/// Default refresh-token lifetime: 7 days.
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Startup configuration for token issuance and validation.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// HS256 signing secret shared by access and refresh tokens.
    pub token_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl CoreConfig {
    /// Creates a configuration with default token lifetimes.
    ///
    /// # Errors
    /// - Returns `ConfigError::EmptySecret` when the secret is blank.
    pub fn new(token_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let token_secret = token_secret.into();
        if token_secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self {
            token_secret,
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        })
    }

    /// Overrides both token lifetimes, in seconds.
    pub fn with_ttls(mut self, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }
}

/// Configuration construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptySecret,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "token secret must not be empty"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};

    #[test]
    fn defaults_match_documented_lifetimes() {
        let config = CoreConfig::new("s3cret").expect("config should build");
        assert_eq!(config.access_ttl_secs, DEFAULT_ACCESS_TTL_SECS);
        assert_eq!(config.refresh_ttl_secs, DEFAULT_REFRESH_TTL_SECS);
    }

    #[test]
    fn rejects_blank_secret() {
        assert_eq!(CoreConfig::new("   ").unwrap_err(), ConfigError::EmptySecret);
    }

    #[test]
    fn ttl_override_applies() {
        let config = CoreConfig::new("s3cret")
            .expect("config should build")
            .with_ttls(60, 120);
        assert_eq!(config.access_ttl_secs, 60);
        assert_eq!(config.refresh_ttl_secs, 120);
    }
}

//! Bearer identity resolution.
//!
//! # Responsibility
//! - Extract the bearer credential from a raw `Authorization` header value,
//!   validate it and load the current user.
//!
//! # Invariants
//! - This is the sole entry point protected operations use to learn "who is
//!   asking"; it runs before any authorization check.
//! - A valid token whose subject row is gone surfaces as `UserGone`, not as
//!   a generic authentication failure.

use super::token::TokenService;
use super::{AuthError, AuthResult};
use crate::config::CoreConfig;
use crate::model::user::User;
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use log::debug;
use rusqlite::Connection;

/// Resolves a raw `Authorization` header to a [`User`].
pub struct IdentityResolver {
    tokens: TokenService,
}

impl IdentityResolver {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            tokens: TokenService::new(config),
        }
    }

    /// Resolves `header` (the raw `Authorization` value, if any) to a user.
    ///
    /// # Errors
    /// - `Unauthenticated` when the header is missing/malformed or the token
    ///   fails validation.
    /// - `UserGone` when the token subject no longer exists.
    pub fn resolve(&self, conn: &Connection, header: Option<&str>) -> AuthResult<User> {
        let credential = extract_bearer(header).ok_or(AuthError::Unauthenticated)?;
        let subject_id = self.tokens.validate(credential).map_err(|_| {
            debug!("event=identity_resolve module=auth status=deny reason=invalid_token");
            AuthError::Unauthenticated
        })?;

        SqliteUserRepository::new(conn)
            .get_user(subject_id)?
            .ok_or_else(|| {
                debug!(
                    "event=identity_resolve module=auth status=deny reason=user_gone subject={subject_id}"
                );
                AuthError::UserGone
            })
    }
}

/// Extracts the credential from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively; an empty credential or any
/// other shape yields `None`.
fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, rest) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let credential = rest.trim();
    if credential.is_empty() {
        return None;
    }
    Some(credential)
}

#[cfg(test)]
mod tests {
    use super::extract_bearer;

    #[test]
    fn extracts_bearer_credential() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer(Some("bearer tok")), Some("tok"));
        assert_eq!(extract_bearer(Some("  Bearer   tok  ")), Some("tok"));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert_eq!(extract_bearer(None), None);
        assert_eq!(extract_bearer(Some("")), None);
        assert_eq!(extract_bearer(Some("Bearer")), None);
        assert_eq!(extract_bearer(Some("Bearer   ")), None);
        assert_eq!(extract_bearer(Some("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer(Some("tok-without-scheme")), None);
    }
}

//! Authentication and authorization.
//!
//! # Responsibility
//! - Credential hashing, token issuance/validation, bearer identity
//!   resolution and the workspace-scoped authorization engine.
//!
//! # Invariants
//! - Every protected operation resolves identity first, then asks the
//!   engine, and only then touches storage.
//! - Authorization reads membership rows fresh on every check.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod credentials;
pub mod engine;
pub mod identity;
pub mod token;

pub type AuthResult<T> = Result<T, AuthError>;

/// Errors from identity resolution and authorization checks.
#[derive(Debug)]
pub enum AuthError {
    /// Missing/malformed header, bad signature, expired token.
    Unauthenticated,
    /// Authenticated but lacking the required role.
    Forbidden,
    /// Target resource or an ancestor in its chain is gone.
    NotFound(&'static str),
    /// Token subject no longer exists.
    UserGone,
    /// Underlying storage failure.
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::Forbidden => write!(f, "access denied"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::UserGone => write!(f, "user not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for AuthError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

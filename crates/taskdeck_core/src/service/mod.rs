//! Use-case services.
//!
//! # Responsibility
//! - Provide the operation surface callers (HTTP handlers, CLI) invoke.
//! - Gate every operation through identity/authorization before storage.
//!
//! # Invariants
//! - Services fail fast with the first violated precondition; no partial
//!   writes happen after a deny.
//! - Partial updates apply only the fields present in the patch.

use crate::auth::AuthError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod auth_service;
pub mod comment_service;
pub mod project_service;
pub mod reminder_service;
pub mod task_service;
pub mod workspace_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error taxonomy; `status_code` gives the HTTP mapping.
#[derive(Debug)]
pub enum ServiceError {
    /// Missing/invalid credentials. 401.
    Unauthenticated,
    /// Authenticated but lacking the required role. 403.
    Forbidden,
    /// Resource or an ancestor in its chain is gone. 404.
    NotFound(&'static str),
    /// Duplicate unique key. 400.
    Conflict(String),
    /// Payload failed structural validation. 400.
    Invalid(String),
    /// Storage failure. 500.
    Storage(RepoError),
    /// Hashing/signing machinery failed. 500.
    Internal(String),
}

impl ServiceError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::Invalid(_) => 400,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::Forbidden => write!(f, "access denied"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Invalid(message) => write!(f, "{message}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, .. } => Self::NotFound(entity),
            RepoError::EmailTaken(email) => {
                Self::Conflict(format!("email already registered: {email}"))
            }
            RepoError::DuplicateMember {
                workspace_id,
                user_id,
            } => Self::Conflict(format!(
                "user {user_id} is already a member of workspace {workspace_id}"
            )),
            other => Self::Storage(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Unauthenticated => Self::Unauthenticated,
            AuthError::Forbidden => Self::Forbidden,
            AuthError::NotFound(entity) => Self::NotFound(entity),
            AuthError::UserGone => Self::NotFound("user"),
            AuthError::Repo(err) => err.into(),
        }
    }
}

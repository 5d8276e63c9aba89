//! Repository contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical storage, one repository per
//!   aggregate.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Repositories never make authorization decisions; callers gate access
//!   through the authorization engine first.
//! - Multi-row writes (workspace + creator membership, task + reminder)
//!   share one transaction.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_repo;
pub mod member_repo;
pub mod project_repo;
pub mod reminder_repo;
pub mod task_repo;
pub mod user_repo;
pub mod workspace_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Shared error type for all repository operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    EmailTaken(String),
    DuplicateMember { workspace_id: i64, user_id: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::EmailTaken(email) => write!(f, "email already registered: {email}"),
            Self::DuplicateMember {
                workspace_id,
                user_id,
            } => write!(
                f,
                "user {user_id} already has a membership in workspace {workspace_id}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

// SQLITE_CONSTRAINT_UNIQUE extended result code.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.extended_code == SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

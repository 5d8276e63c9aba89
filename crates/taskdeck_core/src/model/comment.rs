//! Task comment model.

use serde::Serialize;

/// Upper bound on stored comment length, in characters.
pub const MAX_COMMENT_CHARS: usize = 10_000;

/// Free-text note attached to one task by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

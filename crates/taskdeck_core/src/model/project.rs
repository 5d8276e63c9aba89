//! Project model.

use serde::Serialize;

/// Grouping of tasks inside exactly one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub workspace_id: i64,
    pub created_by: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Sparse patch for project updates; absent fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
}

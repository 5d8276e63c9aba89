//! Workspace model, the root of the authorization hierarchy.

use serde::Serialize;

/// Top-level tenant container. Projects and memberships hang off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub created_by: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Sparse patch for workspace updates; absent fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct WorkspacePatch {
    pub name: Option<String>,
}

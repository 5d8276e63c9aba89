//! Workspace access levels and membership grants.
//!
//! # Responsibility
//! - Define the closed role set used by the authorization engine.
//! - Define the membership record, the sole source of authorization truth.
//!
//! # Invariants
//! - `(workspace_id, user_id)` is unique per membership.
//! - A non-creator's capability is determined only by `access_level`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Role a user holds inside one workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Full control, owner-equivalent.
    Admin,
    /// Can create and edit content.
    Member,
    /// Read-only.
    Viewer,
}

impl AccessLevel {
    /// Every role; the "any member at all" set used for read gates.
    pub const ALL: &'static [AccessLevel] = &[Self::Admin, Self::Member, Self::Viewer];
    /// Roles allowed to mutate tasks (the editor-or-owner gate).
    pub const EDITORS: &'static [AccessLevel] = &[Self::Admin, Self::Member];

    /// Stable string id stored in `workspace_users.access_level`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }

    /// Parses the stored string form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(workspace, user, access_level)` grant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Membership {
    pub id: i64,
    pub workspace_id: i64,
    pub user_id: i64,
    pub access_level: AccessLevel,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

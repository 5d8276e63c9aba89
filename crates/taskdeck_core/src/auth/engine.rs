//! Workspace-scoped authorization engine.
//!
//! # Responsibility
//! - Resolve any resource to its owning workspace by walking the parent
//!   chain with explicit queries.
//! - Decide allow/deny from the membership registry.
//!
//! # Invariants
//! - A broken parent link fails `NotFound` before any authorization
//!   decision is attempted.
//! - `owner_only` accepts exactly the `admin` level; workspace creators get
//!   their grant through the auto-created admin membership, never through
//!   `created_by` equality.
//! - Checks run strictly before writes; a deny leaves no partial state.

use super::{AuthError, AuthResult};
use crate::model::access::AccessLevel;
use crate::model::user::User;
use crate::repo::member_repo::{MembershipRegistry, SqliteMembershipRegistry};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// A resource the engine can resolve to its owning workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Workspace(i64),
    Project(i64),
    Task(i64),
    Comment(i64),
}

/// Resolves a resource to the id of its owning workspace.
///
/// # Errors
/// - `NotFound` naming the first missing link in the parent chain.
pub fn owning_workspace(conn: &Connection, resource: Resource) -> AuthResult<i64> {
    match resource {
        Resource::Workspace(id) => {
            workspace_exists(conn, id)?;
            Ok(id)
        }
        Resource::Project(id) => workspace_of_project(conn, id),
        Resource::Task(id) => {
            let project_id = project_of_task(conn, id)?;
            workspace_of_project(conn, project_id)
        }
        Resource::Comment(id) => {
            let task_id = task_of_comment(conn, id)?;
            let project_id = project_of_task(conn, task_id)?;
            workspace_of_project(conn, project_id)
        }
    }
}

/// Returns whether the user holds one of `allowed` levels in the workspace.
pub fn has_role(
    conn: &Connection,
    workspace_id: i64,
    user: &User,
    allowed: &[AccessLevel],
) -> AuthResult<bool> {
    let level = SqliteMembershipRegistry::new(conn).access_level(workspace_id, user.id)?;
    Ok(level.is_some_and(|held| allowed.contains(&held)))
}

/// Fails `Forbidden` unless the user holds one of `allowed` levels.
pub fn require_role(
    conn: &Connection,
    workspace_id: i64,
    user: &User,
    allowed: &[AccessLevel],
) -> AuthResult<()> {
    if has_role(conn, workspace_id, user, allowed)? {
        return Ok(());
    }
    debug!(
        "event=authz module=auth status=deny check=role workspace={} user={}",
        workspace_id, user.id
    );
    Err(AuthError::Forbidden)
}

/// Fails `Forbidden` unless the user's membership level is exactly `admin`.
pub fn owner_only(conn: &Connection, workspace_id: i64, user: &User) -> AuthResult<()> {
    let level = SqliteMembershipRegistry::new(conn).access_level(workspace_id, user.id)?;
    if level == Some(AccessLevel::Admin) {
        return Ok(());
    }
    debug!(
        "event=authz module=auth status=deny check=owner workspace={} user={}",
        workspace_id, user.id
    );
    Err(AuthError::Forbidden)
}

fn workspace_exists(conn: &Connection, workspace_id: i64) -> AuthResult<()> {
    let found = conn
        .query_row(
            "SELECT id FROM workspaces WHERE id = ?1;",
            params![workspace_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(AuthError::NotFound("workspace")),
    }
}

/// Explicit parent lookup: project -> workspace.
pub fn workspace_of_project(conn: &Connection, project_id: i64) -> AuthResult<i64> {
    conn.query_row(
        "SELECT workspace_id FROM projects WHERE id = ?1;",
        params![project_id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(AuthError::NotFound("project"))
}

/// Explicit parent lookup: task -> project.
pub fn project_of_task(conn: &Connection, task_id: i64) -> AuthResult<i64> {
    conn.query_row(
        "SELECT project_id FROM tasks WHERE id = ?1;",
        params![task_id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(AuthError::NotFound("task"))
}

/// Explicit parent lookup: comment -> task.
pub fn task_of_comment(conn: &Connection, comment_id: i64) -> AuthResult<i64> {
    conn.query_row(
        "SELECT task_id FROM comments WHERE id = ?1;",
        params![comment_id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(AuthError::NotFound("comment"))
}

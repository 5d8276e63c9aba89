//! Workspace repository contract and SQLite implementation.
//!
//! # Invariants
//! - Creating a workspace always creates exactly one admin membership for
//!   its creator, in the same transaction.
//! - Deleting a workspace cascades to projects, tasks, reminders, comments
//!   and memberships via schema foreign keys.

use super::{RepoError, RepoResult};
use crate::model::access::AccessLevel;
use crate::model::workspace::{Workspace, WorkspacePatch};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const WORKSPACE_SELECT_SQL: &str = "SELECT
    id,
    name,
    created_by,
    created_at,
    updated_at
FROM workspaces";

/// Repository interface for workspaces.
pub trait WorkspaceRepository {
    /// Creates the workspace and its creator's admin membership atomically.
    fn create_workspace(&self, creator_id: i64, name: &str) -> RepoResult<Workspace>;
    fn get_workspace(&self, id: i64) -> RepoResult<Option<Workspace>>;
    fn update_workspace(&self, id: i64, patch: &WorkspacePatch) -> RepoResult<Workspace>;
    fn delete_workspace(&self, id: i64) -> RepoResult<()>;
    /// Workspaces the user holds any membership in, newest first.
    fn list_for_member(&self, user_id: i64) -> RepoResult<Vec<Workspace>>;
}

/// SQLite-backed workspace repository.
pub struct SqliteWorkspaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository<'_> {
    fn create_workspace(&self, creator_id: i64, name: &str) -> RepoResult<Workspace> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO workspaces (name, created_by) VALUES (?1, ?2);",
            params![name, creator_id],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO workspace_users (workspace_id, user_id, access_level)
             VALUES (?1, ?2, ?3);",
            params![id, creator_id, AccessLevel::Admin.as_str()],
        )?;

        let workspace = tx
            .query_row(
                &format!("{WORKSPACE_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_workspace_row,
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                entity: "workspace",
                id,
            })?;

        tx.commit()?;
        Ok(workspace)
    }

    fn get_workspace(&self, id: i64) -> RepoResult<Option<Workspace>> {
        let workspace = self
            .conn
            .query_row(
                &format!("{WORKSPACE_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_workspace_row,
            )
            .optional()?;
        Ok(workspace)
    }

    fn update_workspace(&self, id: i64, patch: &WorkspacePatch) -> RepoResult<Workspace> {
        if let Some(name) = &patch.name {
            let changed = self.conn.execute(
                "UPDATE workspaces
                 SET name = ?1, updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?2;",
                params![name, id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "workspace",
                    id,
                });
            }
        }

        self.get_workspace(id)?.ok_or(RepoError::NotFound {
            entity: "workspace",
            id,
        })
    }

    fn delete_workspace(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM workspaces WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "workspace",
                id,
            });
        }
        Ok(())
    }

    fn list_for_member(&self, user_id: i64) -> RepoResult<Vec<Workspace>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORKSPACE_SELECT_SQL}
             WHERE id IN (SELECT workspace_id FROM workspace_users WHERE user_id = ?1)
             ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query(params![user_id])?;

        let mut workspaces = Vec::new();
        while let Some(row) = rows.next()? {
            workspaces.push(parse_workspace_row(row)?);
        }
        Ok(workspaces)
    }
}

fn parse_workspace_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get("id")?,
        name: row.get("name")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

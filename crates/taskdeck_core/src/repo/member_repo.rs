//! Membership registry: the `workspace_users` join table.
//!
//! # Responsibility
//! - Answer "which role does this user hold in this workspace", always with
//!   a fresh read so role changes take effect on the next request.
//! - Manage membership grants.
//!
//! # Invariants
//! - `(workspace_id, user_id)` is unique; duplicate grants surface as
//!   `DuplicateMember`.

use super::{is_unique_violation, RepoError, RepoResult};
use crate::model::access::{AccessLevel, Membership};
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEMBER_SELECT_SQL: &str = "SELECT
    id,
    workspace_id,
    user_id,
    access_level,
    created_at,
    updated_at
FROM workspace_users";

/// The sole source of authorization truth for the engine.
pub trait MembershipRegistry {
    /// Role of `user_id` in `workspace_id`, `None` when not a member.
    fn access_level(&self, workspace_id: i64, user_id: i64) -> RepoResult<Option<AccessLevel>>;
    fn add_member(
        &self,
        workspace_id: i64,
        user_id: i64,
        level: AccessLevel,
    ) -> RepoResult<Membership>;
    fn get_membership(&self, id: i64) -> RepoResult<Option<Membership>>;
    fn update_level(&self, id: i64, level: AccessLevel) -> RepoResult<Membership>;
    fn remove_member(&self, id: i64) -> RepoResult<()>;
    fn list_for_workspace(&self, workspace_id: i64) -> RepoResult<Vec<Membership>>;
    fn list_for_user(&self, user_id: i64) -> RepoResult<Vec<Membership>>;
}

/// SQLite-backed membership registry.
pub struct SqliteMembershipRegistry<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMembershipRegistry<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch(&self, id: i64) -> RepoResult<Membership> {
        self.get_membership(id)?.ok_or(RepoError::NotFound {
            entity: "membership",
            id,
        })
    }
}

impl MembershipRegistry for SqliteMembershipRegistry<'_> {
    fn access_level(&self, workspace_id: i64, user_id: i64) -> RepoResult<Option<AccessLevel>> {
        let stored = self
            .conn
            .query_row(
                "SELECT access_level FROM workspace_users
                 WHERE workspace_id = ?1 AND user_id = ?2;",
                params![workspace_id, user_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match stored {
            None => Ok(None),
            Some(value) => Ok(Some(parse_access_level(&value)?)),
        }
    }

    fn add_member(
        &self,
        workspace_id: i64,
        user_id: i64,
        level: AccessLevel,
    ) -> RepoResult<Membership> {
        let inserted = self.conn.execute(
            "INSERT INTO workspace_users (workspace_id, user_id, access_level)
             VALUES (?1, ?2, ?3);",
            params![workspace_id, user_id, level.as_str()],
        );
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(RepoError::DuplicateMember {
                    workspace_id,
                    user_id,
                });
            }
            return Err(err.into());
        }

        self.fetch(self.conn.last_insert_rowid())
    }

    fn get_membership(&self, id: i64) -> RepoResult<Option<Membership>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_membership_row(row)?));
        }
        Ok(None)
    }

    fn update_level(&self, id: i64, level: AccessLevel) -> RepoResult<Membership> {
        let changed = self.conn.execute(
            "UPDATE workspace_users
             SET access_level = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![level.as_str(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "membership",
                id,
            });
        }
        self.fetch(id)
    }

    fn remove_member(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM workspace_users WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "membership",
                id,
            });
        }
        Ok(())
    }

    fn list_for_workspace(&self, workspace_id: i64) -> RepoResult<Vec<Membership>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} WHERE workspace_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![workspace_id])?;

        let mut memberships = Vec::new();
        while let Some(row) = rows.next()? {
            memberships.push(parse_membership_row(row)?);
        }
        Ok(memberships)
    }

    fn list_for_user(&self, user_id: i64) -> RepoResult<Vec<Membership>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![user_id])?;

        let mut memberships = Vec::new();
        while let Some(row) = rows.next()? {
            memberships.push(parse_membership_row(row)?);
        }
        Ok(memberships)
    }
}

fn parse_access_level(value: &str) -> RepoResult<AccessLevel> {
    AccessLevel::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid access level `{value}` in workspace_users.access_level"
        ))
    })
}

fn parse_membership_row(row: &Row<'_>) -> RepoResult<Membership> {
    let stored: String = row.get("access_level")?;
    Ok(Membership {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        user_id: row.get("user_id")?,
        access_level: parse_access_level(&stored)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

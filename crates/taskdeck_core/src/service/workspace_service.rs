//! Workspace and membership use cases.
//!
//! # Invariants
//! - Ownership is decided only by the membership registry: the creator's
//!   capability comes from the auto-created admin membership, and every
//!   gate here routes through the engine (`created_by` equality is never
//!   consulted).
//! - Membership mutation is admin-only; listing members needs any role.

use super::{ServiceError, ServiceResult};
use crate::auth::engine::{owner_only, owning_workspace, require_role, Resource};
use crate::model::access::{AccessLevel, Membership};
use crate::model::user::User;
use crate::model::workspace::{Workspace, WorkspacePatch};
use crate::repo::member_repo::{MembershipRegistry, SqliteMembershipRegistry};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::workspace_repo::{SqliteWorkspaceRepository, WorkspaceRepository};
use log::info;
use rusqlite::Connection;

/// Workspace use cases over one connection.
pub struct WorkspaceService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> WorkspaceService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates a workspace; the caller becomes its admin member.
    pub fn create(&self, user: &User, name: &str) -> ServiceResult<Workspace> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("workspace name must not be empty".into()));
        }

        let workspace = SqliteWorkspaceRepository::new(self.conn).create_workspace(user.id, name)?;
        info!(
            "event=workspace_create module=service status=ok workspace={} user={}",
            workspace.id, user.id
        );
        Ok(workspace)
    }

    /// Returns one workspace. Admin membership required.
    pub fn get(&self, user: &User, workspace_id: i64) -> ServiceResult<Workspace> {
        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        owner_only(self.conn, resolved, user)?;

        SqliteWorkspaceRepository::new(self.conn)
            .get_workspace(workspace_id)?
            .ok_or(ServiceError::NotFound("workspace"))
    }

    /// Workspaces the caller holds any membership in.
    pub fn list(&self, user: &User) -> ServiceResult<Vec<Workspace>> {
        Ok(SqliteWorkspaceRepository::new(self.conn).list_for_member(user.id)?)
    }

    /// The caller's own grants across all workspaces, with their levels.
    pub fn memberships(&self, user: &User) -> ServiceResult<Vec<Membership>> {
        Ok(SqliteMembershipRegistry::new(self.conn).list_for_user(user.id)?)
    }

    /// Applies a sparse patch. Admin membership required.
    pub fn update(
        &self,
        user: &User,
        workspace_id: i64,
        patch: &WorkspacePatch,
    ) -> ServiceResult<Workspace> {
        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        owner_only(self.conn, resolved, user)?;

        Ok(SqliteWorkspaceRepository::new(self.conn).update_workspace(workspace_id, patch)?)
    }

    /// Deletes the workspace and its whole subtree. Admin membership required.
    pub fn delete(&self, user: &User, workspace_id: i64) -> ServiceResult<()> {
        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        owner_only(self.conn, resolved, user)?;

        SqliteWorkspaceRepository::new(self.conn).delete_workspace(workspace_id)?;
        info!(
            "event=workspace_delete module=service status=ok workspace={} user={}",
            workspace_id, user.id
        );
        Ok(())
    }

    /// Grants `level` to `member_user_id`. Admin membership required.
    pub fn add_member(
        &self,
        user: &User,
        workspace_id: i64,
        member_user_id: i64,
        level: AccessLevel,
    ) -> ServiceResult<Membership> {
        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        owner_only(self.conn, resolved, user)?;

        SqliteUserRepository::new(self.conn)
            .get_user(member_user_id)?
            .ok_or(ServiceError::NotFound("user"))?;

        Ok(SqliteMembershipRegistry::new(self.conn).add_member(
            workspace_id,
            member_user_id,
            level,
        )?)
    }

    /// Changes an existing grant's level. Admin membership required.
    pub fn update_member(
        &self,
        user: &User,
        membership_id: i64,
        level: AccessLevel,
    ) -> ServiceResult<Membership> {
        let registry = SqliteMembershipRegistry::new(self.conn);
        let membership = registry
            .get_membership(membership_id)?
            .ok_or(ServiceError::NotFound("membership"))?;
        owner_only(self.conn, membership.workspace_id, user)?;

        Ok(registry.update_level(membership_id, level)?)
    }

    /// Revokes a grant. Admin membership required.
    pub fn remove_member(&self, user: &User, membership_id: i64) -> ServiceResult<()> {
        let registry = SqliteMembershipRegistry::new(self.conn);
        let membership = registry
            .get_membership(membership_id)?
            .ok_or(ServiceError::NotFound("membership"))?;
        owner_only(self.conn, membership.workspace_id, user)?;

        registry.remove_member(membership_id)?;
        Ok(())
    }

    /// Lists all grants of a workspace. Any role suffices.
    pub fn list_members(&self, user: &User, workspace_id: i64) -> ServiceResult<Vec<Membership>> {
        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        require_role(self.conn, resolved, user, AccessLevel::ALL)?;

        Ok(SqliteMembershipRegistry::new(self.conn).list_for_workspace(workspace_id)?)
    }
}

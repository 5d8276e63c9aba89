//! Project use cases.
//!
//! # Invariants
//! - Mutation (create/update/delete) is admin-only on the owning workspace;
//!   reads need any role.

use super::{ServiceError, ServiceResult};
use crate::auth::engine::{
    owner_only, owning_workspace, require_role, workspace_of_project, Resource,
};
use crate::model::access::AccessLevel;
use crate::model::project::{Project, ProjectPatch};
use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use log::info;
use rusqlite::Connection;

/// Project use cases over one connection.
pub struct ProjectService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ProjectService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates a project. Workspace admin only.
    pub fn create(&self, user: &User, workspace_id: i64, name: &str) -> ServiceResult<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("project name must not be empty".into()));
        }

        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        owner_only(self.conn, resolved, user)?;

        let project =
            SqliteProjectRepository::new(self.conn).create_project(workspace_id, user.id, name)?;
        info!(
            "event=project_create module=service status=ok project={} workspace={} user={}",
            project.id, workspace_id, user.id
        );
        Ok(project)
    }

    /// Returns one project. Any role in its workspace suffices.
    pub fn get(&self, user: &User, project_id: i64) -> ServiceResult<Project> {
        let workspace_id = workspace_of_project(self.conn, project_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        SqliteProjectRepository::new(self.conn)
            .get_project(project_id)?
            .ok_or(ServiceError::NotFound("project"))
    }

    /// Applies a sparse patch. Workspace admin only.
    pub fn update(
        &self,
        user: &User,
        project_id: i64,
        patch: &ProjectPatch,
    ) -> ServiceResult<Project> {
        let workspace_id = workspace_of_project(self.conn, project_id)?;
        owner_only(self.conn, workspace_id, user)?;

        Ok(SqliteProjectRepository::new(self.conn).update_project(project_id, patch)?)
    }

    /// Deletes the project and its tasks. Workspace admin only.
    pub fn delete(&self, user: &User, project_id: i64) -> ServiceResult<()> {
        let workspace_id = workspace_of_project(self.conn, project_id)?;
        owner_only(self.conn, workspace_id, user)?;

        SqliteProjectRepository::new(self.conn).delete_project(project_id)?;
        info!(
            "event=project_delete module=service status=ok project={} user={}",
            project_id, user.id
        );
        Ok(())
    }

    /// Tasks of one project. Any role in its workspace suffices.
    pub fn tasks(&self, user: &User, project_id: i64) -> ServiceResult<Vec<Task>> {
        let workspace_id = workspace_of_project(self.conn, project_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        Ok(SqliteTaskRepository::new(self.conn).list_for_project(project_id)?)
    }

    /// Projects the caller created in one workspace. Any role suffices.
    pub fn list_created(&self, user: &User, workspace_id: i64) -> ServiceResult<Vec<Project>> {
        let resolved = owning_workspace(self.conn, Resource::Workspace(workspace_id))?;
        require_role(self.conn, resolved, user, AccessLevel::ALL)?;

        Ok(SqliteProjectRepository::new(self.conn).list_created_by(workspace_id, user.id)?)
    }
}

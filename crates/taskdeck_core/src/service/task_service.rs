//! Task use cases.
//!
//! # Invariants
//! - Creation and edits require an editor role (admin or member) in the
//!   owning workspace.
//! - Completion is special-cased: any member may ask, but only the
//!   assignee or an editor may flip the flag.
//! - Due dates must be calendar-shaped `YYYY-MM-DD` before storage is
//!   touched.

use super::{ServiceError, ServiceResult};
use crate::auth::engine::{
    has_role, owning_workspace, require_role, workspace_of_project, Resource,
};
use crate::model::access::AccessLevel;
use crate::model::task::{is_valid_date, NewTask, Task, TaskDayEntry, TaskPatch, TaskWithReminders};
use crate::model::user::User;
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use log::info;
use rusqlite::Connection;

/// Task use cases over one connection.
pub struct TaskService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> TaskService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates a task, with its reminder when `remind_at` is set. Editor
    /// role required in the owning workspace.
    pub fn create(&self, user: &User, task: &NewTask) -> ServiceResult<Task> {
        if task.name.trim().is_empty() {
            return Err(ServiceError::Invalid("task name must not be empty".into()));
        }
        if let Some(date) = &task.due_date {
            check_date(date)?;
        }

        let workspace_id = workspace_of_project(self.conn, task.project_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::EDITORS)?;

        let created = SqliteTaskRepository::new(self.conn).create_task(task, user.id)?;
        info!(
            "event=task_create module=service status=ok task={} project={} user={}",
            created.id, created.project_id, user.id
        );
        Ok(created)
    }

    /// Returns one task. Any role in its workspace suffices.
    pub fn get(&self, user: &User, task_id: i64) -> ServiceResult<Task> {
        let workspace_id = self.workspace_of(task_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        SqliteTaskRepository::new(self.conn)
            .get_task(task_id)?
            .ok_or(ServiceError::NotFound("task"))
    }

    /// Applies a sparse patch. Editor role required.
    pub fn update(&self, user: &User, task_id: i64, patch: &TaskPatch) -> ServiceResult<Task> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ServiceError::Invalid("task name must not be empty".into()));
            }
        }
        if let Some(Some(date)) = &patch.due_date {
            check_date(date)?;
        }

        let workspace_id = self.workspace_of(task_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::EDITORS)?;

        Ok(SqliteTaskRepository::new(self.conn).update_task(task_id, patch)?)
    }

    /// Deletes the task and its reminders/comments. Editor role required.
    pub fn delete(&self, user: &User, task_id: i64) -> ServiceResult<()> {
        let workspace_id = self.workspace_of(task_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::EDITORS)?;

        SqliteTaskRepository::new(self.conn).delete_task(task_id)?;
        info!(
            "event=task_delete module=service status=ok task={} user={}",
            task_id, user.id
        );
        Ok(())
    }

    /// Flips the completion flag.
    ///
    /// Membership of any level gets the caller in the door; the write is
    /// then allowed to the assignee or an editor, everyone else is
    /// `Forbidden`.
    pub fn set_completed(
        &self,
        user: &User,
        task_id: i64,
        completed: bool,
    ) -> ServiceResult<Task> {
        let workspace_id = self.workspace_of(task_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        let repo = SqliteTaskRepository::new(self.conn);
        let task = repo
            .get_task(task_id)?
            .ok_or(ServiceError::NotFound("task"))?;

        let is_assignee = task.assigned_to == Some(user.id);
        if !is_assignee && !has_role(self.conn, workspace_id, user, AccessLevel::EDITORS)? {
            return Err(ServiceError::Forbidden);
        }

        Ok(repo.set_completed(task_id, completed)?)
    }

    /// Task joined with its reminders. Any role suffices.
    pub fn with_reminders(&self, user: &User, task_id: i64) -> ServiceResult<TaskWithReminders> {
        let workspace_id = self.workspace_of(task_id)?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        SqliteTaskRepository::new(self.conn)
            .task_with_reminders(task_id)?
            .ok_or(ServiceError::NotFound("task"))
    }

    /// The caller's own assigned tasks due on `date`, across workspaces.
    pub fn assigned_on_date(&self, user: &User, date: &str) -> ServiceResult<Vec<TaskDayEntry>> {
        check_date(date)?;
        Ok(SqliteTaskRepository::new(self.conn).assigned_on_date(user.id, date)?)
    }

    fn workspace_of(&self, task_id: i64) -> ServiceResult<i64> {
        Ok(owning_workspace(self.conn, Resource::Task(task_id))?)
    }
}

fn check_date(date: &str) -> ServiceResult<()> {
    if is_valid_date(date) {
        return Ok(());
    }
    Err(ServiceError::Invalid(format!(
        "due date must be YYYY-MM-DD, got {date:?}"
    )))
}

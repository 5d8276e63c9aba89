//! Comment use cases.
//!
//! Any role in the owning workspace may read or write comments; the
//! content bound is enforced here, before storage. Removal is allowed to
//! the comment's author or an editor.

use super::{ServiceError, ServiceResult};
use crate::auth::engine::{has_role, owning_workspace, require_role, Resource};
use crate::model::access::AccessLevel;
use crate::model::comment::{Comment, MAX_COMMENT_CHARS};
use crate::model::user::User;
use crate::repo::comment_repo::{CommentRepository, SqliteCommentRepository};
use log::info;
use rusqlite::Connection;

/// Comment use cases over one connection.
pub struct CommentService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CommentService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Adds a comment to a task. Any role in the workspace suffices.
    pub fn create(&self, user: &User, task_id: i64, content: &str) -> ServiceResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::Invalid("comment must not be empty".into()));
        }
        if content.chars().count() > MAX_COMMENT_CHARS {
            return Err(ServiceError::Invalid(format!(
                "comment exceeds {MAX_COMMENT_CHARS} characters"
            )));
        }

        let workspace_id = owning_workspace(self.conn, Resource::Task(task_id))?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        let comment = SqliteCommentRepository::new(self.conn).create_comment(
            task_id,
            user.id,
            content,
        )?;
        info!(
            "event=comment_create module=service status=ok comment={} task={} user={}",
            comment.id, task_id, user.id
        );
        Ok(comment)
    }

    /// Comments of one task, oldest first. Any role suffices.
    pub fn list_for_task(&self, user: &User, task_id: i64) -> ServiceResult<Vec<Comment>> {
        let workspace_id = owning_workspace(self.conn, Resource::Task(task_id))?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        Ok(SqliteCommentRepository::new(self.conn).list_for_task(task_id)?)
    }

    /// Removes a comment. The author may remove their own; editors may
    /// remove anyone's.
    pub fn delete(&self, user: &User, comment_id: i64) -> ServiceResult<()> {
        let workspace_id = owning_workspace(self.conn, Resource::Comment(comment_id))?;
        require_role(self.conn, workspace_id, user, AccessLevel::ALL)?;

        let repo = SqliteCommentRepository::new(self.conn);
        let comment = repo
            .get_comment(comment_id)?
            .ok_or(ServiceError::NotFound("comment"))?;
        let is_author = comment.user_id == user.id;
        if !is_author && !has_role(self.conn, workspace_id, user, AccessLevel::EDITORS)? {
            return Err(ServiceError::Forbidden);
        }

        repo.delete_comment(comment_id)?;
        info!(
            "event=comment_delete module=service status=ok comment={} user={}",
            comment_id, user.id
        );
        Ok(())
    }
}

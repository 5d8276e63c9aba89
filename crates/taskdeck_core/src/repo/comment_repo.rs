//! Comment repository contract and SQLite implementation.

use super::{RepoError, RepoResult};
use crate::model::comment::Comment;
use rusqlite::{params, Connection, Row};

const COMMENT_SELECT_SQL: &str = "SELECT
    id,
    task_id,
    user_id,
    content,
    created_at,
    updated_at
FROM comments";

/// Repository interface for task comments.
pub trait CommentRepository {
    fn create_comment(&self, task_id: i64, user_id: i64, content: &str) -> RepoResult<Comment>;
    fn get_comment(&self, id: i64) -> RepoResult<Option<Comment>>;
    /// Comments of one task, oldest first.
    fn list_for_task(&self, task_id: i64) -> RepoResult<Vec<Comment>>;
    fn delete_comment(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, task_id: i64, user_id: i64, content: &str) -> RepoResult<Comment> {
        self.conn.execute(
            "INSERT INTO comments (task_id, user_id, content) VALUES (?1, ?2, ?3);",
            params![task_id, user_id, content],
        )?;
        let id = self.conn.last_insert_rowid();

        self.get_comment(id)?.ok_or(RepoError::NotFound {
            entity: "comment",
            id,
        })
    }

    fn get_comment(&self, id: i64) -> RepoResult<Option<Comment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }
        Ok(None)
    }

    fn list_for_task(&self, task_id: i64) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL} WHERE task_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(params![task_id])?;

        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }

    fn delete_comment(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "comment",
                id,
            });
        }
        Ok(())
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        user_id: row.get("user_id")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

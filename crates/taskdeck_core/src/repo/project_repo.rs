//! Project repository contract and SQLite implementation.

use super::{RepoError, RepoResult};
use crate::model::project::{Project, ProjectPatch};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    workspace_id,
    created_by,
    created_at,
    updated_at
FROM projects";

/// Repository interface for projects.
pub trait ProjectRepository {
    fn create_project(&self, workspace_id: i64, creator_id: i64, name: &str)
        -> RepoResult<Project>;
    fn get_project(&self, id: i64) -> RepoResult<Option<Project>>;
    fn update_project(&self, id: i64, patch: &ProjectPatch) -> RepoResult<Project>;
    fn delete_project(&self, id: i64) -> RepoResult<()>;
    /// Projects the user created in one workspace, oldest first.
    fn list_created_by(&self, workspace_id: i64, user_id: i64) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(
        &self,
        workspace_id: i64,
        creator_id: i64,
        name: &str,
    ) -> RepoResult<Project> {
        self.conn.execute(
            "INSERT INTO projects (name, workspace_id, created_by) VALUES (?1, ?2, ?3);",
            params![name, workspace_id, creator_id],
        )?;
        let id = self.conn.last_insert_rowid();

        self.get_project(id)?.ok_or(RepoError::NotFound {
            entity: "project",
            id,
        })
    }

    fn get_project(&self, id: i64) -> RepoResult<Option<Project>> {
        let project = self
            .conn
            .query_row(
                &format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_project_row,
            )
            .optional()?;
        Ok(project)
    }

    fn update_project(&self, id: i64, patch: &ProjectPatch) -> RepoResult<Project> {
        if let Some(name) = &patch.name {
            let changed = self.conn.execute(
                "UPDATE projects
                 SET name = ?1, updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?2;",
                params![name, id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "project",
                    id,
                });
            }
        }

        self.get_project(id)?.ok_or(RepoError::NotFound {
            entity: "project",
            id,
        })
    }

    fn delete_project(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    fn list_created_by(&self, workspace_id: i64, user_id: i64) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE workspace_id = ?1 AND created_by = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![workspace_id, user_id])?;

        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        workspace_id: row.get("workspace_id")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

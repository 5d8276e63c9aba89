//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Task CRUD, completion toggling and the per-date assignment report.
//! - Atomic create-with-optional-reminder.
//!
//! # Invariants
//! - `create_task` writes the task and its optional reminder in one
//!   transaction; a failed reminder insert rolls back the task.
//! - Partial updates touch only fields present in the patch.
//! - `assigned_to = Some(0)` is normalized to `None` (unassigned).

use super::{int_to_bool, RepoError, RepoResult};
use crate::model::task::{NewTask, Task, TaskDayEntry, TaskPatch, TaskWithReminders};
use crate::repo::reminder_repo::{ReminderRepository, SqliteReminderRepository};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, Row, Transaction, TransactionBehavior,
};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    name,
    project_id,
    created_by,
    assigned_to,
    due_date,
    priority,
    is_completed,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for tasks.
pub trait TaskRepository {
    /// Creates the task; when `remind_at` is set, the reminder row is part
    /// of the same transaction.
    fn create_task(&self, task: &NewTask, created_by: i64) -> RepoResult<Task>;
    fn get_task(&self, id: i64) -> RepoResult<Option<Task>>;
    fn update_task(&self, id: i64, patch: &TaskPatch) -> RepoResult<Task>;
    fn delete_task(&self, id: i64) -> RepoResult<()>;
    fn set_completed(&self, id: i64, completed: bool) -> RepoResult<Task>;
    fn list_for_project(&self, project_id: i64) -> RepoResult<Vec<Task>>;
    /// Task joined with all of its reminders.
    fn task_with_reminders(&self, id: i64) -> RepoResult<Option<TaskWithReminders>>;
    /// Caller's assigned tasks due on `date`, joined with project and
    /// workspace names, ordered by `(due_date, id)`.
    fn assigned_on_date(&self, user_id: i64, date: &str) -> RepoResult<Vec<TaskDayEntry>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch(&self, id: i64) -> RepoResult<Task> {
        self.get_task(id)?.ok_or(RepoError::NotFound {
            entity: "task",
            id,
        })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &NewTask, created_by: i64) -> RepoResult<Task> {
        // An explicit zero assignee from clients means "unassigned".
        let assigned_to = task.assigned_to.filter(|id| *id != 0);

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO tasks (name, project_id, created_by, assigned_to, due_date, priority)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.name,
                task.project_id,
                created_by,
                assigned_to,
                task.due_date.as_deref(),
                task.priority.as_deref(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        if let Some(remind_at) = task.remind_at {
            SqliteReminderRepository::new(&tx).create_reminder(id, remind_at)?;
        }

        tx.commit()?;
        self.fetch(id)
    }

    fn get_task(&self, id: i64) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn update_task(&self, id: i64, patch: &TaskPatch) -> RepoResult<Task> {
        if patch.is_empty() {
            return self.fetch(id);
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &patch.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(assigned_to) = &patch.assigned_to {
            assignments.push("assigned_to = ?");
            bind_values.push(match assigned_to.filter(|id| *id != 0) {
                Some(user_id) => Value::Integer(user_id),
                None => Value::Null,
            });
        }
        if let Some(due_date) = &patch.due_date {
            assignments.push("due_date = ?");
            bind_values.push(match due_date {
                Some(date) => Value::Text(date.clone()),
                None => Value::Null,
            });
        }
        if let Some(priority) = &patch.priority {
            assignments.push("priority = ?");
            bind_values.push(match priority {
                Some(label) => Value::Text(label.clone()),
                None => Value::Null,
            });
        }
        if let Some(is_completed) = patch.is_completed {
            assignments.push("is_completed = ?");
            bind_values.push(Value::Integer(i64::from(is_completed)));
        }

        let sql = format!(
            "UPDATE tasks
             SET {}, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id,
            });
        }

        self.fetch(id)
    }

    fn delete_task(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id,
            });
        }
        Ok(())
    }

    fn set_completed(&self, id: i64, completed: bool) -> RepoResult<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET is_completed = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![i64::from(completed), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id,
            });
        }
        self.fetch(id)
    }

    fn list_for_project(&self, project_id: i64) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE project_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![project_id])?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn task_with_reminders(&self, id: i64) -> RepoResult<Option<TaskWithReminders>> {
        let task = match self.get_task(id)? {
            Some(task) => task,
            None => return Ok(None),
        };

        let reminders = SqliteReminderRepository::new(self.conn).list_for_task(id)?;
        Ok(Some(TaskWithReminders { task, reminders }))
    }

    fn assigned_on_date(&self, user_id: i64, date: &str) -> RepoResult<Vec<TaskDayEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                tasks.id,
                tasks.name,
                tasks.due_date,
                tasks.is_completed,
                tasks.created_at,
                tasks.updated_at,
                projects.name AS project_name,
                workspaces.name AS workspace_name
             FROM tasks
             JOIN projects ON tasks.project_id = projects.id
             JOIN workspaces ON projects.workspace_id = workspaces.id
             WHERE tasks.assigned_to = ?1 AND tasks.due_date = ?2
             ORDER BY tasks.due_date ASC, tasks.id ASC;",
        )?;
        let mut rows = stmt.query(params![user_id, date])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(TaskDayEntry {
                id: row.get("id")?,
                name: row.get("name")?,
                project: row.get("project_name")?,
                workspace: row.get("workspace_name")?,
                due_date: row.get("due_date")?,
                is_completed: int_to_bool(row.get("is_completed")?, "tasks.is_completed")?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
            });
        }
        Ok(entries)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: row.get("id")?,
        name: row.get("name")?,
        project_id: row.get("project_id")?,
        created_by: row.get("created_by")?,
        assigned_to: row.get("assigned_to")?,
        due_date: row.get("due_date")?,
        priority: row.get("priority")?,
        is_completed: int_to_bool(row.get("is_completed")?, "tasks.is_completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

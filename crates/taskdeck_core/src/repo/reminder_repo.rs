//! Reminder repository contract and SQLite implementation.
//!
//! Reminder delivery is out of scope; this layer only stores rows and
//! answers the "due and unsent" query for a user's assigned tasks.

use super::{int_to_bool, RepoError, RepoResult};
use crate::model::task::{DueReminder, Reminder};
use rusqlite::{params, Connection, Row};

/// Repository interface for reminders.
pub trait ReminderRepository {
    fn create_reminder(&self, task_id: i64, remind_at: i64) -> RepoResult<Reminder>;
    fn list_for_task(&self, task_id: i64) -> RepoResult<Vec<Reminder>>;
    /// Reminders whose time has passed and that are still unsent, for tasks
    /// assigned to `user_id`.
    fn due_unsent_for_user(&self, user_id: i64, now_ms: i64) -> RepoResult<Vec<DueReminder>>;
    /// The reminder, only when its task is assigned to `user_id`.
    fn get_for_assignee(&self, id: i64, user_id: i64) -> RepoResult<Option<Reminder>>;
    fn mark_sent(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed reminder repository.
pub struct SqliteReminderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReminderRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReminderRepository for SqliteReminderRepository<'_> {
    fn create_reminder(&self, task_id: i64, remind_at: i64) -> RepoResult<Reminder> {
        self.conn.execute(
            "INSERT INTO reminders (task_id, remind_at) VALUES (?1, ?2);",
            params![task_id, remind_at],
        )?;
        let id = self.conn.last_insert_rowid();

        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, remind_at, is_sent, created_at
             FROM reminders WHERE id = ?1;",
        )?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_reminder_row(row),
            None => Err(RepoError::NotFound {
                entity: "reminder",
                id,
            }),
        }
    }

    fn list_for_task(&self, task_id: i64) -> RepoResult<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, remind_at, is_sent, created_at
             FROM reminders WHERE task_id = ?1 ORDER BY remind_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query(params![task_id])?;

        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(parse_reminder_row(row)?);
        }
        Ok(reminders)
    }

    fn due_unsent_for_user(&self, user_id: i64, now_ms: i64) -> RepoResult<Vec<DueReminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                reminders.id AS reminder_id,
                reminders.remind_at,
                tasks.id AS task_id,
                tasks.name AS task_name,
                tasks.project_id,
                tasks.due_date
             FROM reminders
             JOIN tasks ON reminders.task_id = tasks.id
             WHERE tasks.assigned_to = ?1
               AND reminders.remind_at <= ?2
               AND reminders.is_sent = 0
             ORDER BY reminders.remind_at ASC, reminders.id ASC;",
        )?;
        let mut rows = stmt.query(params![user_id, now_ms])?;

        let mut due = Vec::new();
        while let Some(row) = rows.next()? {
            due.push(DueReminder {
                reminder_id: row.get("reminder_id")?,
                remind_at: row.get("remind_at")?,
                task_id: row.get("task_id")?,
                task_name: row.get("task_name")?,
                project_id: row.get("project_id")?,
                due_date: row.get("due_date")?,
            });
        }
        Ok(due)
    }

    fn get_for_assignee(&self, id: i64, user_id: i64) -> RepoResult<Option<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT reminders.id, reminders.task_id, reminders.remind_at,
                    reminders.is_sent, reminders.created_at
             FROM reminders
             JOIN tasks ON reminders.task_id = tasks.id
             WHERE reminders.id = ?1 AND tasks.assigned_to = ?2;",
        )?;
        let mut rows = stmt.query(params![id, user_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_reminder_row(row)?));
        }
        Ok(None)
    }

    fn mark_sent(&self, id: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE reminders SET is_sent = 1 WHERE id = ?1;",
            params![id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "reminder",
                id,
            });
        }
        Ok(())
    }
}

fn parse_reminder_row(row: &Row<'_>) -> RepoResult<Reminder> {
    Ok(Reminder {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        remind_at: row.get("remind_at")?,
        is_sent: int_to_bool(row.get("is_sent")?, "reminders.is_sent")?,
        created_at: row.get("created_at")?,
    })
}

//! Reminder queries for the signed-in user.
//!
//! Delivery (mail, push) is out of scope; callers poll `due_unsent` and
//! acknowledge with `mark_sent`.

use super::{ServiceError, ServiceResult};
use crate::model::task::DueReminder;
use crate::model::user::User;
use crate::repo::reminder_repo::{ReminderRepository, SqliteReminderRepository};
use rusqlite::Connection;
use std::time::{SystemTime, UNIX_EPOCH};

/// Reminder use cases over one connection.
pub struct ReminderService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ReminderService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Due, unsent reminders on tasks assigned to the caller.
    pub fn due_unsent(&self, user: &User) -> ServiceResult<Vec<DueReminder>> {
        let now_ms = epoch_millis()?;
        Ok(SqliteReminderRepository::new(self.conn).due_unsent_for_user(user.id, now_ms)?)
    }

    /// Marks one of the caller's due reminders as sent.
    ///
    /// The reminder must belong to a task assigned to the caller; anything
    /// else reads as `NotFound` so ids cannot be probed across users.
    pub fn mark_sent(&self, user: &User, reminder_id: i64) -> ServiceResult<()> {
        let repo = SqliteReminderRepository::new(self.conn);
        repo.get_for_assignee(reminder_id, user.id)?
            .ok_or(ServiceError::NotFound("reminder"))?;
        Ok(repo.mark_sent(reminder_id)?)
    }
}

fn epoch_millis() -> ServiceResult<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    i64::try_from(elapsed.as_millis())
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

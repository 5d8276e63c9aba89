//! Task and reminder models plus creation/update payloads.
//!
//! # Invariants
//! - A task belongs to exactly one project; its owning workspace is reached
//!   through that project.
//! - `due_date` is a `YYYY-MM-DD` string; `is_valid_date` is the single
//!   validation point for date inputs.
//! - `priority` is a free-form label (none/low/normal/high by convention,
//!   deliberately unvalidated).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$")
        .unwrap_or_else(|err| panic!("date regex must compile: {err}"))
});

/// Returns whether `value` is a well-formed `YYYY-MM-DD` date.
pub fn is_valid_date(value: &str) -> bool {
    DATE_RE.is_match(value)
}

/// Actionable item inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
    pub created_by: i64,
    /// `None` means unassigned.
    pub assigned_to: Option<i64>,
    /// `YYYY-MM-DD`, `None` when the task has no deadline.
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub is_completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Payload for task creation. A present `remind_at` creates one reminder
/// row in the same transaction as the task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub project_id: i64,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    /// Unix epoch milliseconds of the optional reminder.
    pub remind_at: Option<i64>,
}

/// Sparse patch for task updates.
///
/// Outer `None` means "leave untouched"; for nullable columns the inner
/// `Option` carries the new stored value, so `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub assigned_to: Option<Option<i64>>,
    pub due_date: Option<Option<String>>,
    pub priority: Option<Option<String>>,
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    /// Returns whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.is_completed.is_none()
    }
}

/// Scheduled notification for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: i64,
    pub task_id: i64,
    /// Unix epoch milliseconds.
    pub remind_at: i64,
    pub is_sent: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Task joined with its reminders, for the explicit read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskWithReminders {
    pub task: Task,
    pub reminders: Vec<Reminder>,
}

/// One row of the per-date assignment report: the caller's task joined
/// with its project and workspace names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDayEntry {
    pub id: i64,
    pub name: String,
    pub project: String,
    pub workspace: String,
    pub due_date: String,
    pub is_completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Due, unsent reminder joined with its task fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueReminder {
    pub reminder_id: i64,
    pub remind_at: i64,
    pub task_id: i64,
    pub task_name: String,
    pub project_id: i64,
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{is_valid_date, TaskPatch};

    #[test]
    fn accepts_well_formed_dates() {
        assert!(is_valid_date("2024-01-01"));
        assert!(is_valid_date("1999-12-31"));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date("2024-00-10"));
        assert!(!is_valid_date("2024-01-32"));
        assert!(!is_valid_date("24-01-01"));
        assert!(!is_valid_date("2024/01/01"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }
}

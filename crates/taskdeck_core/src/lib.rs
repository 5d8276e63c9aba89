//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::access::{AccessLevel, Membership};
pub use model::task::{NewTask, Task, TaskPatch};
pub use model::user::User;
pub use model::workspace::Workspace;
pub use service::auth_service::AuthService;
pub use service::comment_service::CommentService;
pub use service::project_service::ProjectService;
pub use service::reminder_service::ReminderService;
pub use service::task_service::TaskService;
pub use service::workspace_service::WorkspaceService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

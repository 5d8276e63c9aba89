//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `email` is unique; a duplicate insert surfaces as `EmailTaken` and
//!   leaves no row behind.
//! - Deleting a user nullifies task assignments (schema `ON DELETE SET
//!   NULL`) and cascades rows the user created.

use super::{is_unique_violation, RepoError, RepoResult};
use crate::model::user::{NewUser, User};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    password_hash,
    created_at,
    updated_at
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: i64) -> RepoResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn delete_user(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let inserted = self.conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?1, ?2, ?3);",
            params![user.name, user.email, user.password_hash],
        );
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(RepoError::EmailTaken(user.email.clone()));
            }
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        self.get_user(id)?.ok_or(RepoError::NotFound {
            entity: "user",
            id,
        })
    }

    fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
                params![email],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn delete_user(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "user",
                id,
            });
        }
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

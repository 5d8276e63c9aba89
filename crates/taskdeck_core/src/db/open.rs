//! SQLite connection bootstrap.
//!
//! # Invariants
//! - Every returned connection has `foreign_keys = ON`; workspace teardown
//!   and assignee nulling depend on the schema cascades firing.
//! - Migrations are fully applied before a connection is handed out.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) a database file, ready to use.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_connection("file", || Connection::open(path))
}

/// Opens a throwaway in-memory database; behavior matches [`open_db`].
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_connection("memory", Connection::open_in_memory)
}

fn open_connection(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let result: DbResult<Connection> = (|| {
        let mut conn = open()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    })();

    let elapsed_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} elapsed_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} elapsed_ms={elapsed_ms} error={err}"
        ),
    }
    result
}

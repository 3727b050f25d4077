//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by cascade deletes.
//! - Initialize the schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, verified by read-back.
//! - Returned connections are at the latest schema revision.

use super::schema::{initialize_schema, verify_schema};
use super::{SetupError, SetupResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and initializes it when fresh.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> SetupResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database with the full schema and seed rows.
pub fn open_db_in_memory() -> SetupResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> SetupResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> SetupResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    let enforced: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if enforced != 1 {
        return Err(SetupError::ForeignKeysDisabled);
    }
    conn.busy_timeout(BUSY_TIMEOUT)?;
    initialize_schema(conn)?;
    verify_schema(conn)?;
    Ok(())
}

//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema revisions in strictly increasing order.
//! - Apply pending revisions atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied revision is mirrored to `PRAGMA user_version`.
//! - Revision 1 is the full initial schema plus seed rows; it only ever runs
//!   against an empty database.

use crate::db::{SetupError, SetupResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest schema revision known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns the revision recorded in `PRAGMA user_version`.
pub fn current_version(conn: &Connection) -> SetupResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies every pending revision inside one transaction.
///
/// Any failing statement rolls the whole batch back, so a failed bootstrap
/// leaves the database exactly as it was found.
pub fn apply_migrations(conn: &mut Connection) -> SetupResult<()> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(SetupError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=schema_migrate module=db status=ok version={}",
            migration.version
        );
    }
    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{latest_version, MIGRATIONS};

    #[test]
    fn migration_versions_are_strictly_increasing() {
        let mut previous = 0;
        for migration in MIGRATIONS {
            assert!(migration.version > previous);
            previous = migration.version;
        }
        assert_eq!(previous, latest_version());
    }

    #[test]
    fn initial_migration_seeds_demo_book() {
        let sql = MIGRATIONS[0].sql;
        assert!(sql.contains("'Demo book'"));
        assert!(sql.contains("'Initial version'"));
    }
}

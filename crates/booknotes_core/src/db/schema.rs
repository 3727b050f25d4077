//! On-disk schema contract and bootstrap entry point.
//!
//! # Responsibility
//! - Name every table, column and index that other readers of the database
//!   file rely on.
//! - Run the initial schema creation for fresh databases.
//! - Check that an opened database actually carries the contract.
//!
//! # Invariants
//! - Table and column names here must match `migrations/0001_init.sql`.
//! - Tables are listed parents-first.

use super::migrations::{apply_migrations, current_version, latest_version};
use super::{SetupError, SetupResult};
use log::{error, info};
use rusqlite::Connection;

/// One table of the durable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableContract {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const VERSION_TABLE: TableContract = TableContract {
    name: "version",
    columns: &["id", "comment"],
};

pub const BOOK_TABLE: TableContract = TableContract {
    name: "book",
    columns: &["id", "title"],
};

pub const CHAPTER_TABLE: TableContract = TableContract {
    name: "chapter",
    columns: &["id", "bookId", "title"],
};

pub const CHAPTER_ITEM_TABLE: TableContract = TableContract {
    name: "chapter_item",
    columns: &["id", "chapterId", "content", "state"],
};

/// Contract tables in creation order.
pub const TABLES: &[TableContract] = &[VERSION_TABLE, BOOK_TABLE, CHAPTER_TABLE, CHAPTER_ITEM_TABLE];

/// Secondary indexes backing chapter lookup and item counting.
pub const INDEXES: &[&str] = &[
    "chapter_on_book_id",
    "chapter_item_on_chapter_id",
    "chapter_item_on_state",
];

/// Creates the schema on a fresh database, or does nothing when the database
/// is already at the latest revision.
///
/// # Errors
/// - `SetupError::UnsupportedSchemaVersion` when the file was written by a
///   newer binary.
/// - `SetupError::Sqlite` when any statement fails; nothing is committed.
pub fn initialize_schema(conn: &mut Connection) -> SetupResult<()> {
    let before = current_version(conn)?;
    match apply_migrations(conn) {
        Ok(()) => {
            if before < latest_version() {
                info!(
                    "event=schema_init module=db status=ok from_version={} to_version={}",
                    before,
                    latest_version()
                );
            }
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error from_version={} error={}",
                before, err
            );
            Err(err)
        }
    }
}

/// Checks that every contract table and column is present.
pub fn verify_schema(conn: &Connection) -> SetupResult<()> {
    for table in TABLES {
        let columns = table_columns(conn, table.name)?;
        if columns.is_empty() {
            return Err(SetupError::MissingTable(table.name));
        }
        for &column in table.columns {
            if !columns.iter().any(|existing| existing == column) {
                return Err(SetupError::MissingColumn {
                    table: table.name,
                    column,
                });
            }
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> SetupResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}

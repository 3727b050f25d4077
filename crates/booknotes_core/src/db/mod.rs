//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for booknotes core.
//! - Create the book/chapter/item schema once per fresh database.
//! - Describe the on-disk table contract shared by every reader.
//!
//! # Invariants
//! - Schema revision is tracked via `PRAGMA user_version`.
//! - Foreign keys are enforced on every connection handed out.
//! - Nothing reads or writes application data before bootstrap succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{initialize_schema, verify_schema};

pub type SetupResult<T> = Result<T, SetupError>;

/// Fatal bootstrap failure. A connection that produced one of these must not
/// be used by repositories.
#[derive(Debug)]
pub enum SetupError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `PRAGMA foreign_keys` did not stick, so cascades would silently not run.
    ForeignKeysDisabled,
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::ForeignKeysDisabled => {
                write!(f, "foreign key enforcement could not be enabled")
            }
            Self::MissingTable(table) => write!(f, "schema is missing table `{table}`"),
            Self::MissingColumn { table, column } => {
                write!(f, "schema is missing column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for SetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::ForeignKeysDisabled
            | Self::MissingTable(_)
            | Self::MissingColumn { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for SetupError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

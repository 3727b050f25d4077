//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Translate book/chapter/item use-cases into single-shot SQL.
//! - Compute derived chapter counters from raw item rows.
//!
//! # Invariants
//! - Every error names the operation that was attempted.
//! - No caching and no retries; a failed call leaves no partial writes.
//! - Deletes rely on `ON DELETE CASCADE`; repositories never delete children.

use crate::db::SetupError;
use crate::model::ValidationError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_repo;
pub mod chapter_item_repo;
pub mod chapter_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identity of a repository call, carried by every `RepoError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOperation {
    Connect,
    ListBooks,
    GetBook,
    CreateBook,
    EditBook,
    DeleteBook,
    ListChapters,
    GetChapter,
    GetChaptersWithCounters,
    CreateChapter,
    EditChapter,
    DeleteChapter,
    ListChapterItems,
    GetChapterItem,
    CreateChapterItem,
    EditChapterItem,
    DeleteChapterItem,
}

impl RepoOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ListBooks => "list_books",
            Self::GetBook => "get_book",
            Self::CreateBook => "create_book",
            Self::EditBook => "edit_book",
            Self::DeleteBook => "delete_book",
            Self::ListChapters => "list_chapters",
            Self::GetChapter => "get_chapter",
            Self::GetChaptersWithCounters => "get_chapters_with_counters",
            Self::CreateChapter => "create_chapter",
            Self::EditChapter => "edit_chapter",
            Self::DeleteChapter => "delete_chapter",
            Self::ListChapterItems => "list_chapter_items",
            Self::GetChapterItem => "get_chapter_item",
            Self::CreateChapterItem => "create_chapter_item",
            Self::EditChapterItem => "edit_chapter_item",
            Self::DeleteChapterItem => "delete_chapter_item",
        }
    }
}

impl Display for RepoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Chapter,
    ChapterItem,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book => f.write_str("book"),
            Self::Chapter => f.write_str("chapter"),
            Self::ChapterItem => f.write_str("chapter item"),
        }
    }
}

/// What went wrong inside a repository call.
#[derive(Debug)]
pub enum RepoErrorKind {
    Setup(SetupError),
    Validation(ValidationError),
    /// Constraint violations and connection failures land here.
    Sqlite(rusqlite::Error),
    NotFound { entity: EntityKind, id: i64 },
    InvalidData(String),
}

impl Display for RepoErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl From<SetupError> for RepoErrorKind {
    fn from(value: SetupError) -> Self {
        Self::Setup(value)
    }
}

impl From<ValidationError> for RepoErrorKind {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for RepoErrorKind {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Recoverable repository failure.
#[derive(Debug)]
pub struct RepoError {
    pub operation: RepoOperation,
    pub kind: RepoErrorKind,
}

impl RepoError {
    pub fn new(operation: RepoOperation, kind: RepoErrorKind) -> Self {
        Self { operation, kind }
    }

    /// Re-attributes a failed helper read to the operation it served.
    pub fn during(self, operation: RepoOperation) -> Self {
        Self::new(operation, self.kind)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, RepoErrorKind::NotFound { .. })
    }

    /// True for SQLite constraint failures such as a dangling foreign key.
    pub fn is_constraint_violation(&self) -> bool {
        match &self.kind {
            RepoErrorKind::Sqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::ConstraintViolation)
            ),
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.kind)
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            RepoErrorKind::Setup(err) => Some(err),
            RepoErrorKind::Validation(err) => Some(err),
            RepoErrorKind::Sqlite(err) => Some(err),
            RepoErrorKind::NotFound { .. } | RepoErrorKind::InvalidData(_) => None,
        }
    }
}

/// Runs one repository call and tags any failure with its operation.
pub(crate) fn run<T>(
    operation: RepoOperation,
    call: impl FnOnce() -> Result<T, RepoErrorKind>,
) -> RepoResult<T> {
    call().map_err(|kind| {
        debug!(
            "event=repo_call module=repo status=error op={} error={}",
            operation, kind
        );
        RepoError::new(operation, kind)
    })
}

pub(crate) fn not_found(entity: EntityKind, id: i64) -> RepoErrorKind {
    RepoErrorKind::NotFound { entity, id }
}

#[cfg(test)]
mod tests {
    use super::{not_found, run, EntityKind, RepoErrorKind, RepoOperation};

    #[test]
    fn run_tags_errors_with_operation() {
        let err = run::<()>(RepoOperation::DeleteChapter, || {
            Err(not_found(EntityKind::Chapter, 7))
        })
        .unwrap_err();

        assert_eq!(err.operation, RepoOperation::DeleteChapter);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "delete_chapter failed: chapter not found: 7"
        );
    }

    #[test]
    fn during_keeps_kind_and_replaces_operation() {
        let err = run::<()>(RepoOperation::GetChapterItem, || {
            Err(not_found(EntityKind::ChapterItem, 3))
        })
        .unwrap_err()
        .during(RepoOperation::DeleteChapterItem);

        assert_eq!(err.operation, RepoOperation::DeleteChapterItem);
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_data_is_not_a_constraint_violation() {
        let err = run::<()>(RepoOperation::ListChapterItems, || {
            Err(RepoErrorKind::InvalidData("bad".to_string()))
        })
        .unwrap_err();
        assert!(!err.is_constraint_violation());
    }
}

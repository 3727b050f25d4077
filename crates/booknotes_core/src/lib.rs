//! Core data layer for booknotes.
//! Books own chapters, chapters own items; SQLite is the durable copy and
//! `Store` holds the view state derived from it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, SetupError, SetupResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookId, BookPatch, NewBook};
pub use model::chapter::{
    Chapter, ChapterId, ChapterPatch, ChapterWithCounters, ItemCounters, NewChapter,
};
pub use model::chapter_item::{
    ChapterItem, ChapterItemId, ChapterItemPatch, ItemState, NewChapterItem,
};
pub use model::ValidationError;
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::chapter_item_repo::{ChapterItemRepository, SqliteChapterItemRepository};
pub use repo::chapter_repo::{ChapterRepository, SqliteChapterRepository};
pub use repo::{EntityKind, RepoError, RepoErrorKind, RepoOperation, RepoResult};
pub use store::{FetchOutcome, LoadingStatus, Store, StoreAction, StoreState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

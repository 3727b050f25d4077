//! In-memory view state mirrored from the repositories.
//!
//! # Responsibility
//! - Hold per-entity view state (`data` + `loadingStatus`) in slices.
//! - Compose slices into one explicit `Store` that routes actions and
//!   notifies subscribers.
//! - Orchestrate fetch/reset cycles bound to screen mount/unmount.
//!
//! # Invariants
//! - Every state change goes through `Store::dispatch` with a closed action
//!   enum; reducers are total and synchronous.
//! - Loading status moves `initial → loading → loaded|failed`, back to
//!   `loading` on refetch and to `initial` on reset.
//! - A fetch result that arrives after its slice was reset is discarded.

use serde::{Deserialize, Serialize};

pub mod book;
pub mod books;
pub mod chapter_items;
pub mod chapters;
mod commands;
mod root;
mod slice;

pub use book::{BookAction, BookState};
pub use books::{BooksAction, BooksState};
pub use chapter_items::{ChapterItemsAction, ChapterItemsState};
pub use chapters::{ChaptersAction, ChaptersState};
pub use root::{FetchOutcome, FetchTicket, Store, StoreAction, StoreState, Subscriber};
pub use slice::{Slice, SliceId};

/// What a consumer should render for a slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStatus {
    /// Nothing fetched since mount or reset.
    #[default]
    Initial,
    Loading,
    Loaded,
    Failed,
}

impl LoadingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

//! Store composition and fetch orchestration.
//!
//! # Responsibility
//! - Own the composed state tree and route actions to the owning slice.
//! - Notify subscribers after every reduction, in dispatch order.
//! - Run the fetch protocol: optional `loading`, repository read, then
//!   `loaded(data)` + `loaded` status, or `loaded(empty)` + `failed` status.
//!
//! # Invariants
//! - A fetch that starts from `initial` never dispatches `loading`.
//! - Reset epochs live outside `StoreState`, so `reset` yields exactly the
//!   initial slice state while still invalidating outstanding fetches.

use super::book::{BookAction, BookState};
use super::books::{BooksAction, BooksState};
use super::chapter_items::{ChapterItemsAction, ChapterItemsState};
use super::chapters::{ChaptersAction, ChaptersState};
use super::slice::{Slice, SliceId};
use super::LoadingStatus;
use crate::model::book::BookId;
use crate::model::chapter::ChapterId;
use crate::repo::book_repo::BookRepository;
use crate::repo::chapter_item_repo::ChapterItemRepository;
use crate::repo::chapter_repo::ChapterRepository;
use crate::repo::RepoResult;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Composed view state consumed by screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub books: BooksState,
    pub book: BookState,
    pub chapters: ChaptersState,
    pub chapter_items: ChapterItemsState,
}

/// Action addressed to exactly one slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "camelCase")]
pub enum StoreAction {
    Books(BooksAction),
    Book(BookAction),
    Chapters(ChaptersAction),
    ChapterItems(ChapterItemsAction),
}

impl StoreAction {
    pub fn slice(&self) -> SliceId {
        match self {
            Self::Books(_) => SliceId::Books,
            Self::Book(_) => SliceId::Book,
            Self::Chapters(_) => SliceId::Chapters,
            Self::ChapterItems(_) => SliceId::ChapterItems,
        }
    }

    fn is_reset(&self) -> bool {
        match self {
            Self::Books(action) => BooksState::is_reset(action),
            Self::Book(action) => BookState::is_reset(action),
            Self::Chapters(action) => ChaptersState::is_reset(action),
            Self::ChapterItems(action) => ChapterItemsState::is_reset(action),
        }
    }
}

/// Callback invoked after each action is reduced.
pub type Subscriber = Box<dyn FnMut(&StoreAction, &StoreState)>;

/// Handle for one outstanding fetch of slice `S`.
pub struct FetchTicket<S: Slice> {
    key: Option<i64>,
    epoch: u64,
    _slice: PhantomData<S>,
}

impl<S: Slice> Debug for FetchTicket<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchTicket")
            .field("slice", &S::ID.name())
            .field("key", &self.key)
            .field("epoch", &self.epoch)
            .finish()
    }
}

/// How a fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    /// The read failed; the slice now holds empty data and `failed`.
    Failed,
    /// The slice was reset while the read was outstanding; nothing applied.
    Discarded,
}

/// Explicit application store. Construct one at startup and pass it by
/// reference; there is no process-wide instance.
pub struct Store {
    state: StoreState,
    epochs: [u64; SliceId::COUNT],
    /// `None` until a fetch starts; back to `None` on reset.
    keys: [Option<Option<i64>>; SliceId::COUNT],
    subscribers: Vec<Subscriber>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("epochs", &self.epochs)
            .field("keys", &self.keys)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: StoreState::default(),
            epochs: [0; SliceId::COUNT],
            keys: [None; SliceId::COUNT],
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Key of the last fetch started for `slice` since its last reset.
    pub fn slice_key(&self, slice: SliceId) -> Option<i64> {
        self.keys[slice.index()].flatten()
    }

    /// True once a fetch started for `slice` and until it is reset.
    pub fn is_mounted(&self, slice: SliceId) -> bool {
        self.keys[slice.index()].is_some()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreAction, &StoreState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Reduces one action into its slice, then notifies subscribers.
    pub fn dispatch(&mut self, action: StoreAction) {
        let slice = action.slice();
        if action.is_reset() {
            self.epochs[slice.index()] += 1;
            self.keys[slice.index()] = None;
        }

        match action.clone() {
            StoreAction::Books(inner) => self.state.books.reduce(inner),
            StoreAction::Book(inner) => self.state.book.reduce(inner),
            StoreAction::Chapters(inner) => self.state.chapters.reduce(inner),
            StoreAction::ChapterItems(inner) => self.state.chapter_items.reduce(inner),
        }

        for subscriber in &mut self.subscribers {
            subscriber(&action, &self.state);
        }
    }

    /// Dispatches a slice action without naming its `StoreAction` variant.
    pub fn dispatch_to<S: Slice>(&mut self, action: S::Action) {
        self.dispatch(S::route(action));
    }

    /// Starts a fetch for slice `S`.
    ///
    /// Transitions to `loading` unless the slice is still `initial`.
    pub fn begin_fetch<S: Slice>(&mut self, key: Option<i64>) -> FetchTicket<S> {
        if S::select(&self.state).loading_status() != LoadingStatus::Initial {
            self.dispatch_to::<S>(S::loading_status_changed(LoadingStatus::Loading));
        }
        self.keys[S::ID.index()] = Some(key);
        debug!(
            "event=fetch module=store status=start slice={} key={:?}",
            S::ID.name(),
            key
        );
        FetchTicket {
            key,
            epoch: self.epochs[S::ID.index()],
            _slice: PhantomData,
        }
    }

    /// Applies the result of the read started by `ticket`.
    pub fn complete_fetch<S: Slice>(
        &mut self,
        ticket: FetchTicket<S>,
        result: RepoResult<S::Data>,
    ) -> FetchOutcome {
        if ticket.epoch != self.epochs[S::ID.index()] {
            info!(
                "event=fetch module=store status=stale slice={} key={:?}",
                S::ID.name(),
                ticket.key
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(data) => {
                self.dispatch_to::<S>(S::loaded(data));
                self.dispatch_to::<S>(S::loading_status_changed(LoadingStatus::Loaded));
                debug!(
                    "event=fetch module=store status=ok slice={} key={:?}",
                    S::ID.name(),
                    ticket.key
                );
                FetchOutcome::Loaded
            }
            Err(err) => {
                warn!(
                    "event=fetch module=store status=error slice={} key={:?} error={}",
                    S::ID.name(),
                    ticket.key,
                    err
                );
                self.dispatch_to::<S>(S::loaded(S::Data::default()));
                self.dispatch_to::<S>(S::loading_status_changed(LoadingStatus::Failed));
                FetchOutcome::Failed
            }
        }
    }

    pub fn reset<S: Slice>(&mut self) {
        self.dispatch_to::<S>(S::reset());
    }

    pub fn fetch_books<R: BookRepository + ?Sized>(&mut self, repo: &R) -> FetchOutcome {
        let ticket = self.begin_fetch::<BooksState>(None);
        let result = repo.list_books();
        self.complete_fetch(ticket, result)
    }

    pub fn fetch_book<R: BookRepository + ?Sized>(
        &mut self,
        repo: &R,
        book_id: BookId,
    ) -> FetchOutcome {
        let ticket = self.begin_fetch::<BookState>(Some(book_id));
        let result = repo.get_book(book_id).map(Some);
        self.complete_fetch(ticket, result)
    }

    pub fn fetch_chapters<R: ChapterRepository + ?Sized>(
        &mut self,
        repo: &R,
        book_id: BookId,
    ) -> FetchOutcome {
        let ticket = self.begin_fetch::<ChaptersState>(Some(book_id));
        let result = repo.get_chapters_with_counters(book_id);
        self.complete_fetch(ticket, result)
    }

    pub fn fetch_chapter_items<R: ChapterItemRepository + ?Sized>(
        &mut self,
        repo: &R,
        chapter_id: ChapterId,
    ) -> FetchOutcome {
        let ticket = self.begin_fetch::<ChapterItemsState>(Some(chapter_id));
        let result = repo.list_chapter_items(chapter_id);
        self.complete_fetch(ticket, result)
    }

    pub fn reset_books(&mut self) {
        self.reset::<BooksState>();
    }

    pub fn reset_book(&mut self) {
        self.reset::<BookState>();
    }

    pub fn reset_chapters(&mut self) {
        self.reset::<ChaptersState>();
    }

    pub fn reset_chapter_items(&mut self) {
        self.reset::<ChapterItemsState>();
    }
}

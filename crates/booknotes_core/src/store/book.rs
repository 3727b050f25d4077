//! Single-book slice backing the book detail screen.
//!
//! `book` is `None` until a fetch succeeds; a failed fetch (including a
//! missing book) leaves it `None` with status `failed`, which consumers
//! render as "Book not found".

use super::root::{StoreAction, StoreState};
use super::slice::{Slice, SliceId};
use super::LoadingStatus;
use crate::model::book::{Book, BookId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookState {
    pub book: Option<Book>,
    pub loading_status: LoadingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BookAction {
    LoadingStatusChanged(LoadingStatus),
    Loaded(Option<Book>),
    /// Makes a freshly created book the held one.
    Created(Book),
    Edited(Book),
    Deleted(BookId),
    Reset,
}

impl BookState {
    fn holds(&self, id: BookId) -> bool {
        self.book.as_ref().is_some_and(|book| book.id == id)
    }
}

impl Slice for BookState {
    const ID: SliceId = SliceId::Book;
    type Data = Option<Book>;
    type Action = BookAction;

    fn loading_status(&self) -> LoadingStatus {
        self.loading_status
    }

    fn reduce(&mut self, action: BookAction) {
        match action {
            BookAction::LoadingStatusChanged(status) => self.loading_status = status,
            BookAction::Loaded(book) => self.book = book,
            BookAction::Created(book) => self.book = Some(book),
            BookAction::Edited(book) => {
                if self.holds(book.id) {
                    self.book = Some(book);
                }
            }
            BookAction::Deleted(id) => {
                if self.holds(id) {
                    self.book = None;
                }
            }
            BookAction::Reset => *self = Self::default(),
        }
    }

    fn loading_status_changed(status: LoadingStatus) -> BookAction {
        BookAction::LoadingStatusChanged(status)
    }

    fn loaded(data: Option<Book>) -> BookAction {
        BookAction::Loaded(data)
    }

    fn reset() -> BookAction {
        BookAction::Reset
    }

    fn is_reset(action: &BookAction) -> bool {
        matches!(action, BookAction::Reset)
    }

    fn select(state: &StoreState) -> &Self {
        &state.book
    }


    fn route(action: BookAction) -> StoreAction {
        StoreAction::Book(action)
    }
}

#[cfg(test)]
mod tests {
    use super::{BookAction, BookState};
    use crate::model::book::Book;
    use crate::store::{LoadingStatus, Slice};

    fn demo() -> Book {
        Book {
            id: 1,
            title: "Demo book".to_string(),
        }
    }

    #[test]
    fn edit_of_another_book_is_a_noop() {
        let mut state = BookState::default();
        state.reduce(BookAction::Loaded(Some(demo())));
        state.reduce(BookAction::Edited(Book {
            id: 2,
            title: "Other".to_string(),
        }));
        assert_eq!(state.book, Some(demo()));
    }

    #[test]
    fn delete_of_held_book_clears_it() {
        let mut state = BookState::default();
        state.reduce(BookAction::Loaded(Some(demo())));
        state.reduce(BookAction::LoadingStatusChanged(LoadingStatus::Loaded));
        state.reduce(BookAction::Deleted(1));
        assert_eq!(state.book, None);
        assert_eq!(state.loading_status, LoadingStatus::Loaded);
    }

    #[test]
    fn reset_returns_initial_state() {
        let mut state = BookState::default();
        state.reduce(BookAction::Created(demo()));
        state.reduce(BookAction::LoadingStatusChanged(LoadingStatus::Failed));
        state.reduce(BookAction::Reset);
        assert_eq!(state, BookState::default());
    }
}

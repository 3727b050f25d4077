//! Book list slice backing the books overview screen.

use super::root::{StoreAction, StoreState};
use super::slice::{Slice, SliceId};
use super::LoadingStatus;
use crate::model::book::{Book, BookId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksState {
    pub list: Vec<Book>,
    pub loading_status: LoadingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BooksAction {
    LoadingStatusChanged(LoadingStatus),
    Loaded(Vec<Book>),
    Created(Book),
    Edited(Book),
    Deleted(BookId),
    Reset,
}

impl Slice for BooksState {
    const ID: SliceId = SliceId::Books;
    type Data = Vec<Book>;
    type Action = BooksAction;

    fn loading_status(&self) -> LoadingStatus {
        self.loading_status
    }

    fn reduce(&mut self, action: BooksAction) {
        match action {
            BooksAction::LoadingStatusChanged(status) => self.loading_status = status,
            BooksAction::Loaded(list) => self.list = list,
            BooksAction::Created(book) => self.list.push(book),
            BooksAction::Edited(book) => {
                if let Some(existing) = self.list.iter_mut().find(|b| b.id == book.id) {
                    *existing = book;
                }
            }
            BooksAction::Deleted(id) => self.list.retain(|b| b.id != id),
            BooksAction::Reset => *self = Self::default(),
        }
    }

    fn loading_status_changed(status: LoadingStatus) -> BooksAction {
        BooksAction::LoadingStatusChanged(status)
    }

    fn loaded(data: Vec<Book>) -> BooksAction {
        BooksAction::Loaded(data)
    }

    fn reset() -> BooksAction {
        BooksAction::Reset
    }

    fn is_reset(action: &BooksAction) -> bool {
        matches!(action, BooksAction::Reset)
    }

    fn select(state: &StoreState) -> &Self {
        &state.books
    }


    fn route(action: BooksAction) -> StoreAction {
        StoreAction::Books(action)
    }
}

#[cfg(test)]
mod tests {
    use super::{BooksAction, BooksState};
    use crate::model::book::Book;
    use crate::store::{LoadingStatus, Slice};

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
        }
    }

    #[test]
    fn created_appends_and_edited_replaces_in_place() {
        let mut state = BooksState::default();
        state.reduce(BooksAction::Loaded(vec![book(1, "Demo book")]));
        state.reduce(BooksAction::Created(book(2, "Second")));
        state.reduce(BooksAction::Edited(book(1, "Renamed")));

        let titles: Vec<_> = state.list.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Renamed", "Second"]);
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut state = BooksState::default();
        state.reduce(BooksAction::Loaded(vec![book(1, "Demo book")]));
        let before = state.clone();

        state.reduce(BooksAction::Edited(book(42, "Ghost")));
        state.reduce(BooksAction::Deleted(42));
        assert_eq!(state, before);
    }

    #[test]
    fn action_serializes_with_type_and_payload() {
        let json =
            serde_json::to_value(BooksAction::LoadingStatusChanged(LoadingStatus::Loaded)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "loadingStatusChanged", "payload": "loaded" })
        );
    }
}

//! Chapter list slice with derived item counters.
//!
//! # Invariants
//! - List order is the order received from the repository (primary key
//!   order); `Created` appends, `MovedIn` inserts at its id position.
//! - `Edited` goes through `ChapterWithCounters::merge_edit`, so counters
//!   survive edits that do not mention them.
//! - `ItemCountsAdjusted` keeps counters equal to the chapter's item count
//!   after item commands, without a refetch.

use super::root::{StoreAction, StoreState};
use super::slice::{Slice, SliceId};
use super::LoadingStatus;
use crate::model::book::BookId;
use crate::model::chapter::{Chapter, ChapterId, ChapterWithCounters};
use crate::model::chapter_item::ItemState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaptersState {
    pub list: Vec<ChapterWithCounters>,
    pub loading_status: LoadingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ChaptersAction {
    LoadingStatusChanged(LoadingStatus),
    Loaded(Vec<ChapterWithCounters>),
    /// Appends with all counters at zero.
    Created(Chapter),
    Edited(Chapter),
    /// A chapter from another book, with the counters it carries along.
    MovedIn(ChapterWithCounters),
    Deleted(ChapterId),
    /// One item left `removed` and/or entered `added` within a chapter.
    #[serde(rename_all = "camelCase")]
    ItemCountsAdjusted {
        chapter_id: ChapterId,
        removed: Option<ItemState>,
        added: Option<ItemState>,
    },
    /// Drops chapters removed by a book cascade.
    BookDeleted(BookId),
    Reset,
}

impl ChaptersState {
    pub fn find(&self, id: ChapterId) -> Option<&ChapterWithCounters> {
        self.list.iter().find(|c| c.id() == id)
    }

    fn find_mut(&mut self, id: ChapterId) -> Option<&mut ChapterWithCounters> {
        self.list.iter_mut().find(|c| c.id() == id)
    }
}

impl Slice for ChaptersState {
    const ID: SliceId = SliceId::Chapters;
    type Data = Vec<ChapterWithCounters>;
    type Action = ChaptersAction;

    fn loading_status(&self) -> LoadingStatus {
        self.loading_status
    }

    fn reduce(&mut self, action: ChaptersAction) {
        match action {
            ChaptersAction::LoadingStatusChanged(status) => self.loading_status = status,
            ChaptersAction::Loaded(list) => self.list = list,
            ChaptersAction::Created(chapter) => {
                self.list.push(ChapterWithCounters::empty(chapter));
            }
            ChaptersAction::Edited(chapter) => {
                if let Some(existing) = self.find_mut(chapter.id) {
                    existing.merge_edit(&chapter);
                }
            }
            ChaptersAction::MovedIn(chapter) => {
                self.list.retain(|c| c.id() != chapter.id());
                let at = self.list.partition_point(|c| c.id() < chapter.id());
                self.list.insert(at, chapter);
            }
            ChaptersAction::Deleted(id) => self.list.retain(|c| c.id() != id),
            ChaptersAction::ItemCountsAdjusted {
                chapter_id,
                removed,
                added,
            } => {
                if let Some(existing) = self.find_mut(chapter_id) {
                    if let Some(state) = removed {
                        existing.counters.decrement(state);
                    }
                    if let Some(state) = added {
                        existing.counters.increment(state);
                    }
                }
            }
            ChaptersAction::BookDeleted(book_id) => {
                self.list.retain(|c| c.chapter.book_id != book_id);
            }
            ChaptersAction::Reset => *self = Self::default(),
        }
    }

    fn loading_status_changed(status: LoadingStatus) -> ChaptersAction {
        ChaptersAction::LoadingStatusChanged(status)
    }

    fn loaded(data: Vec<ChapterWithCounters>) -> ChaptersAction {
        ChaptersAction::Loaded(data)
    }

    fn reset() -> ChaptersAction {
        ChaptersAction::Reset
    }

    fn is_reset(action: &ChaptersAction) -> bool {
        matches!(action, ChaptersAction::Reset)
    }

    fn select(state: &StoreState) -> &Self {
        &state.chapters
    }


    fn route(action: ChaptersAction) -> StoreAction {
        StoreAction::Chapters(action)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChaptersAction, ChaptersState};
    use crate::model::chapter::{Chapter, ChapterWithCounters, ItemCounters};
    use crate::model::chapter_item::ItemState;
    use crate::store::{LoadingStatus, Slice};

    fn chapter(id: i64, title: &str) -> Chapter {
        Chapter {
            id,
            book_id: 1,
            title: title.to_string(),
        }
    }

    fn loaded_state() -> ChaptersState {
        let mut state = ChaptersState::default();
        state.reduce(ChaptersAction::Loaded(vec![ChapterWithCounters::new(
            chapter(1, "Ch1"),
            ItemCounters {
                count_idea: 1,
                count_in_progress: 0,
                count_done: 2,
            },
        )]));
        state.reduce(ChaptersAction::LoadingStatusChanged(LoadingStatus::Loaded));
        state
    }

    #[test]
    fn created_chapter_starts_with_zero_counters() {
        let mut state = loaded_state();
        state.reduce(ChaptersAction::Created(chapter(2, "Ch2")));

        let created = state.find(2).unwrap();
        assert_eq!(created.counters, ItemCounters::default());
        assert_eq!(state.list.len(), 2);
        assert_eq!(state.list[1].id(), 2);
    }

    #[test]
    fn edit_keeps_counters() {
        let mut state = loaded_state();
        state.reduce(ChaptersAction::Edited(chapter(1, "Renamed")));

        let edited = state.find(1).unwrap();
        assert_eq!(edited.chapter.title, "Renamed");
        assert_eq!(edited.counters.count_done, 2);
        assert_eq!(edited.counters.count_idea, 1);
    }

    #[test]
    fn edit_and_delete_with_unknown_id_leave_state_untouched() {
        let mut state = loaded_state();
        let before = state.clone();

        state.reduce(ChaptersAction::Edited(chapter(77, "Ghost")));
        state.reduce(ChaptersAction::Deleted(77));
        state.reduce(ChaptersAction::ItemCountsAdjusted {
            chapter_id: 77,
            removed: None,
            added: Some(ItemState::Idea),
        });
        assert_eq!(state, before);
    }

    #[test]
    fn item_state_change_moves_one_count() {
        let mut state = loaded_state();
        state.reduce(ChaptersAction::ItemCountsAdjusted {
            chapter_id: 1,
            removed: Some(ItemState::Idea),
            added: Some(ItemState::InProgress),
        });

        let counters = state.find(1).unwrap().counters;
        assert_eq!(counters.count_idea, 0);
        assert_eq!(counters.count_in_progress, 1);
        assert_eq!(counters.total(), 3);
    }

    #[test]
    fn moved_in_chapter_keeps_counters_and_id_order() {
        let mut state = loaded_state();
        state.reduce(ChaptersAction::Created(chapter(9, "Ch9")));
        state.reduce(ChaptersAction::MovedIn(ChapterWithCounters::new(
            chapter(4, "Ch4"),
            ItemCounters {
                count_idea: 0,
                count_in_progress: 3,
                count_done: 0,
            },
        )));

        let ids: Vec<_> = state.list.iter().map(|c| c.id()).collect();
        assert_eq!(ids, [1, 4, 9]);
        assert_eq!(state.find(4).unwrap().counters.count_in_progress, 3);
    }

    #[test]
    fn book_delete_drops_its_chapters() {
        let mut state = loaded_state();
        state.reduce(ChaptersAction::Created(Chapter {
            id: 5,
            book_id: 2,
            title: "Elsewhere".to_string(),
        }));
        state.reduce(ChaptersAction::BookDeleted(1));

        assert_eq!(state.list.len(), 1);
        assert_eq!(state.list[0].chapter.book_id, 2);
    }

    #[test]
    fn reset_from_any_state_is_initial() {
        let mut state = loaded_state();
        state.reduce(ChaptersAction::Reset);
        assert_eq!(state, ChaptersState::default());
    }

    #[test]
    fn state_serializes_with_flat_counters() {
        let json = serde_json::to_value(loaded_state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "list": [{
                    "id": 1,
                    "bookId": 1,
                    "title": "Ch1",
                    "countIdea": 1,
                    "countInProgress": 0,
                    "countDone": 2
                }],
                "loadingStatus": "loaded"
            })
        );
    }
}

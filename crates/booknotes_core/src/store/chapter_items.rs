//! Item list slice for one chapter.

use super::root::{StoreAction, StoreState};
use super::slice::{Slice, SliceId};
use super::LoadingStatus;
use crate::model::chapter::ChapterId;
use crate::model::chapter_item::{ChapterItem, ChapterItemId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterItemsState {
    pub list: Vec<ChapterItem>,
    pub loading_status: LoadingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ChapterItemsAction {
    LoadingStatusChanged(LoadingStatus),
    Loaded(Vec<ChapterItem>),
    Created(ChapterItem),
    Edited(ChapterItem),
    Deleted(ChapterItemId),
    /// Drops items removed by a chapter cascade.
    ChapterDeleted(ChapterId),
    Reset,
}

impl ChapterItemsState {
    pub fn find(&self, id: ChapterItemId) -> Option<&ChapterItem> {
        self.list.iter().find(|item| item.id == id)
    }
}

impl Slice for ChapterItemsState {
    const ID: SliceId = SliceId::ChapterItems;
    type Data = Vec<ChapterItem>;
    type Action = ChapterItemsAction;

    fn loading_status(&self) -> LoadingStatus {
        self.loading_status
    }

    fn reduce(&mut self, action: ChapterItemsAction) {
        match action {
            ChapterItemsAction::LoadingStatusChanged(status) => self.loading_status = status,
            ChapterItemsAction::Loaded(list) => self.list = list,
            ChapterItemsAction::Created(item) => self.list.push(item),
            ChapterItemsAction::Edited(item) => {
                if let Some(existing) = self.list.iter_mut().find(|i| i.id == item.id) {
                    *existing = item;
                }
            }
            ChapterItemsAction::Deleted(id) => self.list.retain(|i| i.id != id),
            ChapterItemsAction::ChapterDeleted(chapter_id) => {
                self.list.retain(|i| i.chapter_id != chapter_id);
            }
            ChapterItemsAction::Reset => *self = Self::default(),
        }
    }

    fn loading_status_changed(status: LoadingStatus) -> ChapterItemsAction {
        ChapterItemsAction::LoadingStatusChanged(status)
    }

    fn loaded(data: Vec<ChapterItem>) -> ChapterItemsAction {
        ChapterItemsAction::Loaded(data)
    }

    fn reset() -> ChapterItemsAction {
        ChapterItemsAction::Reset
    }

    fn is_reset(action: &ChapterItemsAction) -> bool {
        matches!(action, ChapterItemsAction::Reset)
    }

    fn select(state: &StoreState) -> &Self {
        &state.chapter_items
    }


    fn route(action: ChapterItemsAction) -> StoreAction {
        StoreAction::ChapterItems(action)
    }
}

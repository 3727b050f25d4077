//! Shared contract of the entity slices.
//!
//! A slice is a plain state value with a closed action enum and a total
//! reducer. The associated functions let `Store` run the generic fetch
//! orchestration and route actions without string-keyed dispatch.

use super::root::{StoreAction, StoreState};
use super::LoadingStatus;
use std::fmt::Debug;

/// Addressable slot of a slice inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceId {
    Books,
    Book,
    Chapters,
    ChapterItems,
}

impl SliceId {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Self::Books => 0,
            Self::Book => 1,
            Self::Chapters => 2,
            Self::ChapterItems => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Book => "book",
            Self::Chapters => "chapters",
            Self::ChapterItems => "chapter_items",
        }
    }
}

pub trait Slice: Clone + Default + PartialEq + Debug {
    const ID: SliceId;

    /// Payload of a successful fetch. `Default` is the empty value stored
    /// after a failed fetch.
    type Data: Default;
    type Action: Clone + Debug;

    fn loading_status(&self) -> LoadingStatus;

    /// Applies one action. Must be a total function of state + action.
    fn reduce(&mut self, action: Self::Action);

    fn loading_status_changed(status: LoadingStatus) -> Self::Action;
    fn loaded(data: Self::Data) -> Self::Action;
    fn reset() -> Self::Action;
    fn is_reset(action: &Self::Action) -> bool;

    fn select(state: &StoreState) -> &Self;
    fn route(action: Self::Action) -> StoreAction;
}

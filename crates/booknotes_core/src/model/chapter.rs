//! Chapter records and the counter-augmented chapter read model.
//!
//! # Invariants
//! - `ChapterWithCounters` counters are derived from `chapter_item` rows and
//!   are never written back to storage.
//! - An edit payload carries no counters; `merge_edit` is the only way an
//!   edit touches a `ChapterWithCounters`, and it keeps the counters.

use super::book::BookId;
use super::chapter_item::ItemState;
use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned chapter primary key.
pub type ChapterId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub book_id: BookId,
    pub title: String,
}

impl Chapter {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankChapterTitle);
        }
        Ok(())
    }
}

/// Insert payload for a new chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    pub book_id: BookId,
    pub title: String,
}

impl NewChapter {
    pub fn new(book_id: BookId, title: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankChapterTitle);
        }
        Ok(())
    }
}

/// Partial edit of a chapter. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPatch {
    pub book_id: Option<BookId>,
    pub title: Option<String>,
}

impl ChapterPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, chapter: &Chapter) -> Chapter {
        Chapter {
            id: chapter.id,
            book_id: self.book_id.unwrap_or(chapter.book_id),
            title: self.title.clone().unwrap_or_else(|| chapter.title.clone()),
        }
    }
}

/// Per-state item counts of one chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCounters {
    pub count_idea: u32,
    pub count_in_progress: u32,
    pub count_done: u32,
}

impl ItemCounters {
    pub fn get(&self, state: ItemState) -> u32 {
        match state {
            ItemState::Idea => self.count_idea,
            ItemState::InProgress => self.count_in_progress,
            ItemState::Done => self.count_done,
        }
    }

    pub fn add(&mut self, state: ItemState, count: u32) {
        let slot = self.slot_mut(state);
        *slot = slot.saturating_add(count);
    }

    pub fn increment(&mut self, state: ItemState) {
        self.add(state, 1);
    }

    /// Saturates at zero; a decrement for an item the counters never saw is
    /// dropped rather than wrapping.
    pub fn decrement(&mut self, state: ItemState) {
        let slot = self.slot_mut(state);
        *slot = slot.saturating_sub(1);
    }

    pub fn total(&self) -> u32 {
        self.count_idea + self.count_in_progress + self.count_done
    }

    fn slot_mut(&mut self, state: ItemState) -> &mut u32 {
        match state {
            ItemState::Idea => &mut self.count_idea,
            ItemState::InProgress => &mut self.count_in_progress,
            ItemState::Done => &mut self.count_done,
        }
    }
}

/// Chapter joined with derived item counters.
///
/// Serializes flat: `{ id, bookId, title, countIdea, countInProgress, countDone }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterWithCounters {
    #[serde(flatten)]
    pub chapter: Chapter,
    #[serde(flatten)]
    pub counters: ItemCounters,
}

impl ChapterWithCounters {
    pub fn new(chapter: Chapter, counters: ItemCounters) -> Self {
        Self { chapter, counters }
    }

    /// A freshly created chapter has no items yet.
    pub fn empty(chapter: Chapter) -> Self {
        Self::new(chapter, ItemCounters::default())
    }

    pub fn id(&self) -> ChapterId {
        self.chapter.id
    }

    /// Replaces the chapter fields from an edit payload and keeps counters.
    pub fn merge_edit(&mut self, edited: &Chapter) {
        self.chapter = edited.clone();
    }
}

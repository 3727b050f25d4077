//! Chapter items: the leaves of the hierarchy, each with a lifecycle state.

use super::chapter::ChapterId;
use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned chapter item primary key.
pub type ChapterItemId = i64;

/// Item lifecycle state, stored as text in `chapter_item.state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Idea,
    InProgress,
    Done,
}

impl ItemState {
    pub const ALL: [ItemState; 3] = [Self::Idea, Self::InProgress, Self::Done];

    /// Text stored in the database column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idea" => Some(Self::Idea),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterItem {
    pub id: ChapterItemId,
    pub chapter_id: ChapterId,
    pub content: String,
    pub state: ItemState,
}

impl ChapterItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.content) {
            return Err(ValidationError::BlankItemContent);
        }
        Ok(())
    }
}

/// Insert payload for a new chapter item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapterItem {
    pub chapter_id: ChapterId,
    pub content: String,
    pub state: ItemState,
}

impl NewChapterItem {
    pub fn new(chapter_id: ChapterId, content: impl Into<String>, state: ItemState) -> Self {
        Self {
            chapter_id,
            content: content.into(),
            state,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.content) {
            return Err(ValidationError::BlankItemContent);
        }
        Ok(())
    }
}

/// Partial edit of a chapter item. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterItemPatch {
    pub chapter_id: Option<ChapterId>,
    pub content: Option<String>,
    pub state: Option<ItemState>,
}

impl ChapterItemPatch {
    pub fn state(state: ItemState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, item: &ChapterItem) -> ChapterItem {
        ChapterItem {
            id: item.id,
            chapter_id: self.chapter_id.unwrap_or(item.chapter_id),
            content: self.content.clone().unwrap_or_else(|| item.content.clone()),
            state: self.state.unwrap_or(item.state),
        }
    }
}

//! Domain model for the book → chapter → item hierarchy.
//!
//! # Responsibility
//! - Define the records mirrored from SQLite rows.
//! - Define write payloads (`New*`) and partial edits (`*Patch`).
//! - Define the derived `ChapterWithCounters` read model.
//!
//! # Invariants
//! - Ids are assigned by storage; records built in memory never invent them.
//! - Titles and item content are non-blank; `validate()` is the gate.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book;
pub mod chapter;
pub mod chapter_item;

/// Rejected field values on write or read-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    BlankBookTitle,
    BlankChapterTitle,
    BlankItemContent,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankBookTitle => write!(f, "book title must not be blank"),
            Self::BlankChapterTitle => write!(f, "chapter title must not be blank"),
            Self::BlankItemContent => write!(f, "chapter item content must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

//! Book records: the root of the hierarchy.

use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned book primary key.
pub type BookId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
}

impl Book {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankBookTitle);
        }
        Ok(())
    }
}

/// Insert payload for a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
}

impl NewBook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankBookTitle);
        }
        Ok(())
    }
}

/// Partial edit of a book. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
}

impl BookPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }

    /// Returns `book` with the patched fields replaced.
    pub fn apply_to(&self, book: &Book) -> Book {
        Book {
            id: book.id,
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookPatch, NewBook};
    use crate::model::ValidationError;

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            NewBook::new("   ").validate(),
            Err(ValidationError::BlankBookTitle)
        );
    }

    #[test]
    fn empty_patch_keeps_stored_title() {
        let book = Book {
            id: 3,
            title: "Stored".to_string(),
        };
        assert_eq!(BookPatch::default().apply_to(&book), book);
        assert_eq!(BookPatch::title("New").apply_to(&book).title, "New");
    }
}

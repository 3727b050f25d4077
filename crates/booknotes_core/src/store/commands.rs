//! User-triggered write commands.
//!
//! Each command performs one repository write and, only when it succeeded,
//! mirrors the change into the held slices. Repository errors are returned
//! unchanged, tagged with the command's own operation, so the caller decides
//! on user-facing feedback.
//!
//! Slices are keyed by the entity they were fetched for (`Store::slice_key`).
//! A created record is appended only to a mounted slice showing its parent;
//! an unmounted slice stays at its initial state.

use super::book::BookState;
use super::books::BooksState;
use super::chapter_items::ChapterItemsState;
use super::chapters::ChaptersState;
use super::root::Store;
use super::slice::SliceId;
use super::{BookAction, BooksAction, ChapterItemsAction, ChaptersAction};
use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::model::chapter::{Chapter, ChapterId, ChapterPatch, NewChapter};
use crate::model::chapter_item::{ChapterItem, ChapterItemId, ChapterItemPatch, NewChapterItem};
use crate::repo::book_repo::BookRepository;
use crate::repo::chapter_item_repo::ChapterItemRepository;
use crate::repo::chapter_repo::ChapterRepository;
use crate::repo::{RepoOperation, RepoResult};
use log::info;

impl Store {
    fn shows(&self, slice: SliceId, parent_id: i64) -> bool {
        self.slice_key(slice) == Some(parent_id)
    }

    pub fn create_book<R: BookRepository + ?Sized>(
        &mut self,
        repo: &R,
        book: &NewBook,
    ) -> RepoResult<Book> {
        let created = repo.create_book(book)?;
        info!(
            "event=book_create module=store status=ok book_id={}",
            created.id
        );
        if self.is_mounted(SliceId::Books) {
            self.dispatch_to::<BooksState>(BooksAction::Created(created.clone()));
        }
        Ok(created)
    }

    pub fn edit_book<R: BookRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: BookId,
        patch: &BookPatch,
    ) -> RepoResult<Book> {
        let edited = repo.edit_book(id, patch)?;
        self.dispatch_to::<BooksState>(BooksAction::Edited(edited.clone()));
        self.dispatch_to::<BookState>(BookAction::Edited(edited.clone()));
        Ok(edited)
    }

    /// Deletes a book and prunes every slice of the rows the cascade removed.
    ///
    /// The book's chapter ids are read first so the item slice is pruned even
    /// when the chapters slice does not hold them.
    pub fn delete_book<B, C>(&mut self, books: &B, chapters: &C, id: BookId) -> RepoResult<()>
    where
        B: BookRepository + ?Sized,
        C: ChapterRepository + ?Sized,
    {
        let cascaded: Vec<ChapterId> = chapters
            .list_chapters(id)
            .map_err(|err| err.during(RepoOperation::DeleteBook))?
            .into_iter()
            .map(|chapter| chapter.id)
            .collect();
        books.delete_book(id)?;
        info!(
            "event=book_delete module=store status=ok book_id={} chapters={}",
            id,
            cascaded.len()
        );

        self.dispatch_to::<BooksState>(BooksAction::Deleted(id));
        self.dispatch_to::<BookState>(BookAction::Deleted(id));
        self.dispatch_to::<ChaptersState>(ChaptersAction::BookDeleted(id));
        if let Some(shown) = self.slice_key(SliceId::ChapterItems) {
            if cascaded.contains(&shown) {
                self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::ChapterDeleted(shown));
            }
        }
        Ok(())
    }

    pub fn create_chapter<R: ChapterRepository + ?Sized>(
        &mut self,
        repo: &R,
        chapter: &NewChapter,
    ) -> RepoResult<Chapter> {
        let created = repo.create_chapter(chapter)?;
        if self.shows(SliceId::Chapters, created.book_id) {
            self.dispatch_to::<ChaptersState>(ChaptersAction::Created(created.clone()));
        }
        Ok(created)
    }

    /// Edits a chapter. A chapter moved away from the shown book leaves the
    /// held list; one moved into it is re-read with its counters and inserted.
    pub fn edit_chapter<R: ChapterRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: ChapterId,
        patch: &ChapterPatch,
    ) -> RepoResult<Chapter> {
        let edited = repo.edit_chapter(id, patch)?;
        let held_book = self
            .state()
            .chapters
            .find(id)
            .map(|held| held.chapter.book_id);

        match held_book {
            Some(book_id) if book_id != edited.book_id => {
                self.dispatch_to::<ChaptersState>(ChaptersAction::Deleted(id));
            }
            Some(_) => {
                self.dispatch_to::<ChaptersState>(ChaptersAction::Edited(edited.clone()));
            }
            None if self.shows(SliceId::Chapters, edited.book_id) => {
                let arrived = repo
                    .get_chapters_with_counters(edited.book_id)
                    .map_err(|err| err.during(RepoOperation::EditChapter))?
                    .into_iter()
                    .find(|chapter| chapter.id() == id);
                if let Some(arrived) = arrived {
                    self.dispatch_to::<ChaptersState>(ChaptersAction::MovedIn(arrived));
                }
            }
            None => {}
        }
        Ok(edited)
    }

    pub fn delete_chapter<R: ChapterRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: ChapterId,
    ) -> RepoResult<()> {
        repo.delete_chapter(id)?;
        info!("event=chapter_delete module=store status=ok chapter_id={id}");
        self.dispatch_to::<ChaptersState>(ChaptersAction::Deleted(id));
        self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::ChapterDeleted(id));
        Ok(())
    }

    /// Creates an item and bumps its chapter's counter for the new state.
    pub fn create_chapter_item<R: ChapterItemRepository + ?Sized>(
        &mut self,
        repo: &R,
        item: &NewChapterItem,
    ) -> RepoResult<ChapterItem> {
        let created = repo.create_chapter_item(item)?;
        if self.shows(SliceId::ChapterItems, created.chapter_id) {
            self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::Created(created.clone()));
        }
        self.dispatch_to::<ChaptersState>(ChaptersAction::ItemCountsAdjusted {
            chapter_id: created.chapter_id,
            removed: None,
            added: Some(created.state),
        });
        Ok(created)
    }

    /// Edits an item; a state change or a move between chapters shifts one
    /// count between the affected counters.
    pub fn edit_chapter_item<R: ChapterItemRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: ChapterItemId,
        patch: &ChapterItemPatch,
    ) -> RepoResult<ChapterItem> {
        let previous = repo
            .get_chapter_item(id)
            .map_err(|err| err.during(RepoOperation::EditChapterItem))?;
        let edited = repo.edit_chapter_item(id, patch)?;

        if previous.chapter_id == edited.chapter_id {
            self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::Edited(edited.clone()));
            if previous.state != edited.state {
                self.dispatch_to::<ChaptersState>(ChaptersAction::ItemCountsAdjusted {
                    chapter_id: edited.chapter_id,
                    removed: Some(previous.state),
                    added: Some(edited.state),
                });
            }
        } else {
            self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::Deleted(id));
            if self.shows(SliceId::ChapterItems, edited.chapter_id) {
                self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::Created(edited.clone()));
            }
            self.dispatch_to::<ChaptersState>(ChaptersAction::ItemCountsAdjusted {
                chapter_id: previous.chapter_id,
                removed: Some(previous.state),
                added: None,
            });
            self.dispatch_to::<ChaptersState>(ChaptersAction::ItemCountsAdjusted {
                chapter_id: edited.chapter_id,
                removed: None,
                added: Some(edited.state),
            });
        }
        Ok(edited)
    }

    pub fn delete_chapter_item<R: ChapterItemRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: ChapterItemId,
    ) -> RepoResult<()> {
        let previous = repo
            .get_chapter_item(id)
            .map_err(|err| err.during(RepoOperation::DeleteChapterItem))?;
        repo.delete_chapter_item(id)?;
        self.dispatch_to::<ChapterItemsState>(ChapterItemsAction::Deleted(id));
        self.dispatch_to::<ChaptersState>(ChaptersAction::ItemCountsAdjusted {
            chapter_id: previous.chapter_id,
            removed: Some(previous.state),
            added: None,
        });
        Ok(())
    }
}

//! Chapter repository contract, SQLite implementation and counter join.
//!
//! # Responsibility
//! - Chapter CRUD over the `chapter` table.
//! - Build `ChapterWithCounters` by grouping a book's items per chapter and
//!   per state.
//!
//! # Invariants
//! - Chapter lists are ordered by primary key; there is no other order key.
//! - Counter sums equal the number of item rows of each chapter at read time.
//! - A chapter without items reports zero for every counter.

use crate::db::verify_schema;
use crate::model::book::BookId;
use crate::model::chapter::{
    Chapter, ChapterId, ChapterPatch, ChapterWithCounters, ItemCounters, NewChapter,
};
use crate::model::chapter_item::ItemState;
use crate::repo::{not_found, run, EntityKind, RepoErrorKind, RepoOperation, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const CHAPTER_SELECT_SQL: &str = "SELECT id, bookId, title FROM chapter";

/// One `(chapterId, state, count)` group from the item counting query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCount {
    pub chapter_id: ChapterId,
    pub state: ItemState,
    pub count: u32,
}

/// Repository interface for chapter operations.
pub trait ChapterRepository {
    fn list_chapters(&self, book_id: BookId) -> RepoResult<Vec<Chapter>>;
    fn get_chapter(&self, id: ChapterId) -> RepoResult<Chapter>;
    /// Chapters of `book_id` in primary key order, each joined with its
    /// per-state item counts.
    fn get_chapters_with_counters(&self, book_id: BookId) -> RepoResult<Vec<ChapterWithCounters>>;
    fn create_chapter(&self, chapter: &NewChapter) -> RepoResult<Chapter>;
    fn edit_chapter(&self, id: ChapterId, patch: &ChapterPatch) -> RepoResult<Chapter>;
    fn delete_chapter(&self, id: ChapterId) -> RepoResult<()>;
}

/// SQLite-backed chapter repository.
pub struct SqliteChapterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChapterRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        run(RepoOperation::Connect, || {
            verify_schema(conn)?;
            Ok(Self { conn })
        })
    }
}

impl ChapterRepository for SqliteChapterRepository<'_> {
    fn list_chapters(&self, book_id: BookId) -> RepoResult<Vec<Chapter>> {
        run(RepoOperation::ListChapters, || {
            load_chapters(self.conn, book_id)
        })
    }

    fn get_chapter(&self, id: ChapterId) -> RepoResult<Chapter> {
        run(RepoOperation::GetChapter, || load_chapter(self.conn, id))
    }

    fn get_chapters_with_counters(&self, book_id: BookId) -> RepoResult<Vec<ChapterWithCounters>> {
        run(RepoOperation::GetChaptersWithCounters, || {
            let chapters = load_chapters(self.conn, book_id)?;
            if chapters.is_empty() {
                return Ok(Vec::new());
            }
            let counts = load_state_counts(self.conn, book_id)?;
            Ok(attach_counters(chapters, &counts))
        })
    }

    fn create_chapter(&self, chapter: &NewChapter) -> RepoResult<Chapter> {
        run(RepoOperation::CreateChapter, || {
            chapter.validate()?;
            self.conn.execute(
                "INSERT INTO chapter (bookId, title) VALUES (?1, ?2);",
                params![chapter.book_id, chapter.title.as_str()],
            )?;
            Ok(Chapter {
                id: self.conn.last_insert_rowid(),
                book_id: chapter.book_id,
                title: chapter.title.clone(),
            })
        })
    }

    fn edit_chapter(&self, id: ChapterId, patch: &ChapterPatch) -> RepoResult<Chapter> {
        run(RepoOperation::EditChapter, || {
            let tx = self.conn.unchecked_transaction()?;
            let edited = patch.apply_to(&load_chapter(&tx, id)?);
            edited.validate()?;

            let changed = tx.execute(
                "UPDATE chapter SET bookId = ?1, title = ?2 WHERE id = ?3;",
                params![edited.book_id, edited.title.as_str(), id],
            )?;
            if changed == 0 {
                return Err(not_found(EntityKind::Chapter, id));
            }

            tx.commit()?;
            Ok(edited)
        })
    }

    fn delete_chapter(&self, id: ChapterId) -> RepoResult<()> {
        run(RepoOperation::DeleteChapter, || {
            let changed = self
                .conn
                .execute("DELETE FROM chapter WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(not_found(EntityKind::Chapter, id));
            }
            Ok(())
        })
    }
}

/// Joins grouped item counts onto chapters, keeping chapter order.
///
/// Groups for chapters that are not in `chapters` are ignored.
pub fn attach_counters(chapters: Vec<Chapter>, counts: &[StateCount]) -> Vec<ChapterWithCounters> {
    let mut by_chapter: HashMap<ChapterId, ItemCounters> = HashMap::new();
    for group in counts {
        by_chapter
            .entry(group.chapter_id)
            .or_default()
            .add(group.state, group.count);
    }

    chapters
        .into_iter()
        .map(|chapter| {
            let counters = by_chapter.remove(&chapter.id).unwrap_or_default();
            ChapterWithCounters::new(chapter, counters)
        })
        .collect()
}

fn load_chapters(conn: &Connection, book_id: BookId) -> Result<Vec<Chapter>, RepoErrorKind> {
    let mut stmt = conn.prepare(&format!(
        "{CHAPTER_SELECT_SQL} WHERE bookId = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([book_id])?;
    let mut chapters = Vec::new();
    while let Some(row) = rows.next()? {
        chapters.push(parse_chapter_row(row)?);
    }
    Ok(chapters)
}

fn load_chapter(conn: &Connection, id: ChapterId) -> Result<Chapter, RepoErrorKind> {
    let mut stmt = conn.prepare(&format!("{CHAPTER_SELECT_SQL} WHERE id = ?1;"))?;
    let chapter = stmt
        .query_row([id], |row| Ok(parse_chapter_row(row)))
        .optional()?
        .ok_or_else(|| not_found(EntityKind::Chapter, id))??;
    Ok(chapter)
}

fn load_state_counts(conn: &Connection, book_id: BookId) -> Result<Vec<StateCount>, RepoErrorKind> {
    let mut stmt = conn.prepare(
        "SELECT ci.chapterId, ci.state, COUNT(*) AS item_count
         FROM chapter_item ci
         INNER JOIN chapter c ON c.id = ci.chapterId
         WHERE c.bookId = ?1
         GROUP BY ci.chapterId, ci.state;",
    )?;
    let mut rows = stmt.query([book_id])?;
    let mut counts = Vec::new();
    while let Some(row) = rows.next()? {
        let state_text: String = row.get(1)?;
        let state = ItemState::parse(&state_text).ok_or_else(|| {
            RepoErrorKind::InvalidData(format!(
                "invalid item state `{state_text}` in chapter_item.state"
            ))
        })?;
        let count: i64 = row.get(2)?;
        counts.push(StateCount {
            chapter_id: row.get(0)?,
            state,
            count: u32::try_from(count).map_err(|_| {
                RepoErrorKind::InvalidData(format!("item count `{count}` out of range"))
            })?,
        });
    }
    Ok(counts)
}

fn parse_chapter_row(row: &Row<'_>) -> Result<Chapter, RepoErrorKind> {
    let chapter = Chapter {
        id: row.get("id")?,
        book_id: row.get("bookId")?,
        title: row.get("title")?,
    };
    chapter.validate()?;
    Ok(chapter)
}

#[cfg(test)]
mod tests {
    use super::{attach_counters, StateCount};
    use crate::model::chapter::Chapter;
    use crate::model::chapter_item::ItemState;

    fn chapter(id: i64) -> Chapter {
        Chapter {
            id,
            book_id: 1,
            title: format!("Ch{id}"),
        }
    }

    #[test]
    fn chapters_without_items_get_zero_counters() {
        let joined = attach_counters(vec![chapter(1), chapter(2)], &[]);
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|c| c.counters.total() == 0));
    }

    #[test]
    fn counts_are_joined_per_chapter_and_state_keeping_order() {
        let counts = [
            StateCount {
                chapter_id: 2,
                state: ItemState::Done,
                count: 3,
            },
            StateCount {
                chapter_id: 1,
                state: ItemState::Idea,
                count: 1,
            },
            StateCount {
                chapter_id: 2,
                state: ItemState::InProgress,
                count: 2,
            },
            StateCount {
                chapter_id: 99,
                state: ItemState::Idea,
                count: 5,
            },
        ];
        let joined = attach_counters(vec![chapter(1), chapter(2)], &counts);

        assert_eq!(joined[0].id(), 1);
        assert_eq!(joined[0].counters.count_idea, 1);
        assert_eq!(joined[0].counters.total(), 1);
        assert_eq!(joined[1].id(), 2);
        assert_eq!(joined[1].counters.count_done, 3);
        assert_eq!(joined[1].counters.count_in_progress, 2);
        assert_eq!(joined[1].counters.count_idea, 0);
    }
}

//! Chapter item repository contract and SQLite implementation.
//!
//! # Invariants
//! - `state` is persisted as its column text (`idea|in_progress|done`); any
//!   other stored value is reported as invalid data on read.
//! - Item lists are ordered by primary key.

use crate::db::verify_schema;
use crate::model::chapter::ChapterId;
use crate::model::chapter_item::{
    ChapterItem, ChapterItemId, ChapterItemPatch, ItemState, NewChapterItem,
};
use crate::repo::{not_found, run, EntityKind, RepoErrorKind, RepoOperation, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT id, chapterId, content, state FROM chapter_item";

/// Repository interface for chapter item operations.
pub trait ChapterItemRepository {
    fn list_chapter_items(&self, chapter_id: ChapterId) -> RepoResult<Vec<ChapterItem>>;
    fn get_chapter_item(&self, id: ChapterItemId) -> RepoResult<ChapterItem>;
    fn create_chapter_item(&self, item: &NewChapterItem) -> RepoResult<ChapterItem>;
    fn edit_chapter_item(
        &self,
        id: ChapterItemId,
        patch: &ChapterItemPatch,
    ) -> RepoResult<ChapterItem>;
    fn delete_chapter_item(&self, id: ChapterItemId) -> RepoResult<()>;
}

/// SQLite-backed chapter item repository.
pub struct SqliteChapterItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChapterItemRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        run(RepoOperation::Connect, || {
            verify_schema(conn)?;
            Ok(Self { conn })
        })
    }
}

impl ChapterItemRepository for SqliteChapterItemRepository<'_> {
    fn list_chapter_items(&self, chapter_id: ChapterId) -> RepoResult<Vec<ChapterItem>> {
        run(RepoOperation::ListChapterItems, || {
            let mut stmt = self.conn.prepare(&format!(
                "{ITEM_SELECT_SQL} WHERE chapterId = ?1 ORDER BY id ASC;"
            ))?;
            let mut rows = stmt.query([chapter_id])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(parse_item_row(row)?);
            }
            Ok(items)
        })
    }

    fn get_chapter_item(&self, id: ChapterItemId) -> RepoResult<ChapterItem> {
        run(RepoOperation::GetChapterItem, || load_item(self.conn, id))
    }

    fn create_chapter_item(&self, item: &NewChapterItem) -> RepoResult<ChapterItem> {
        run(RepoOperation::CreateChapterItem, || {
            item.validate()?;
            self.conn.execute(
                "INSERT INTO chapter_item (chapterId, content, state) VALUES (?1, ?2, ?3);",
                params![item.chapter_id, item.content.as_str(), item.state.as_str()],
            )?;
            Ok(ChapterItem {
                id: self.conn.last_insert_rowid(),
                chapter_id: item.chapter_id,
                content: item.content.clone(),
                state: item.state,
            })
        })
    }

    fn edit_chapter_item(
        &self,
        id: ChapterItemId,
        patch: &ChapterItemPatch,
    ) -> RepoResult<ChapterItem> {
        run(RepoOperation::EditChapterItem, || {
            let tx = self.conn.unchecked_transaction()?;
            let edited = patch.apply_to(&load_item(&tx, id)?);
            edited.validate()?;

            let changed = tx.execute(
                "UPDATE chapter_item
                 SET chapterId = ?1, content = ?2, state = ?3
                 WHERE id = ?4;",
                params![
                    edited.chapter_id,
                    edited.content.as_str(),
                    edited.state.as_str(),
                    id
                ],
            )?;
            if changed == 0 {
                return Err(not_found(EntityKind::ChapterItem, id));
            }

            tx.commit()?;
            Ok(edited)
        })
    }

    fn delete_chapter_item(&self, id: ChapterItemId) -> RepoResult<()> {
        run(RepoOperation::DeleteChapterItem, || {
            let changed = self
                .conn
                .execute("DELETE FROM chapter_item WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(not_found(EntityKind::ChapterItem, id));
            }
            Ok(())
        })
    }
}

fn load_item(conn: &Connection, id: ChapterItemId) -> Result<ChapterItem, RepoErrorKind> {
    let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
    let item = stmt
        .query_row([id], |row| Ok(parse_item_row(row)))
        .optional()?
        .ok_or_else(|| not_found(EntityKind::ChapterItem, id))??;
    Ok(item)
}

fn parse_item_row(row: &Row<'_>) -> Result<ChapterItem, RepoErrorKind> {
    let state_text: String = row.get("state")?;
    let state = ItemState::parse(&state_text).ok_or_else(|| {
        RepoErrorKind::InvalidData(format!(
            "invalid item state `{state_text}` in chapter_item.state"
        ))
    })?;

    let item = ChapterItem {
        id: row.get("id")?,
        chapter_id: row.get("chapterId")?,
        content: row.get("content")?,
        state,
    };
    item.validate()?;
    Ok(item)
}

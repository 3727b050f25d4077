use booknotes_core::db::open_db_in_memory;
use booknotes_core::{
    BookRepository, ChapterItemPatch, ChapterItemRepository, ChapterRepository, ItemState,
    NewBook, NewChapter, NewChapterItem, SqliteBookRepository, SqliteChapterItemRepository,
    SqliteChapterRepository,
};
use rusqlite::Connection;

const DEMO_BOOK_ID: i64 = 1;

#[test]
fn new_chapter_reports_zero_counters() {
    let conn = open_db_in_memory().unwrap();
    let chapters = SqliteChapterRepository::try_new(&conn).unwrap();

    let chapter = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "Ch1"))
        .unwrap();
    let listed = chapters.get_chapters_with_counters(DEMO_BOOK_ID).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].chapter, chapter);
    assert_eq!(listed[0].counters.count_idea, 0);
    assert_eq!(listed[0].counters.count_in_progress, 0);
    assert_eq!(listed[0].counters.count_done, 0);
}

#[test]
fn counters_group_items_by_state() {
    let conn = open_db_in_memory().unwrap();
    let chapters = SqliteChapterRepository::try_new(&conn).unwrap();
    let items = SqliteChapterItemRepository::try_new(&conn).unwrap();

    let chapter = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "Ch1"))
        .unwrap();
    items
        .create_chapter_item(&NewChapterItem::new(chapter.id, "x", ItemState::Done))
        .unwrap();
    items
        .create_chapter_item(&NewChapterItem::new(chapter.id, "y", ItemState::Idea))
        .unwrap();

    let listed = chapters.get_chapters_with_counters(DEMO_BOOK_ID).unwrap();
    assert_eq!(listed[0].counters.count_done, 1);
    assert_eq!(listed[0].counters.count_idea, 1);
    assert_eq!(listed[0].counters.count_in_progress, 0);

    let json = serde_json::to_value(&listed[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": chapter.id,
            "bookId": DEMO_BOOK_ID,
            "title": "Ch1",
            "countIdea": 1,
            "countInProgress": 0,
            "countDone": 1
        })
    );
}

#[test]
fn chapter_delete_cascades_to_items() {
    let conn = open_db_in_memory().unwrap();
    let chapters = SqliteChapterRepository::try_new(&conn).unwrap();
    let items = SqliteChapterItemRepository::try_new(&conn).unwrap();

    let chapter = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "Ch1"))
        .unwrap();
    items
        .create_chapter_item(&NewChapterItem::new(chapter.id, "x", ItemState::Done))
        .unwrap();
    items
        .create_chapter_item(&NewChapterItem::new(chapter.id, "y", ItemState::Idea))
        .unwrap();

    chapters.delete_chapter(chapter.id).unwrap();

    assert!(chapters
        .get_chapters_with_counters(DEMO_BOOK_ID)
        .unwrap()
        .is_empty());
    assert!(items.list_chapter_items(chapter.id).unwrap().is_empty());
    assert_eq!(count_rows(&conn, "chapter_item"), 0);
}

#[test]
fn book_delete_cascades_through_chapters_and_items() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let chapters = SqliteChapterRepository::try_new(&conn).unwrap();
    let items = SqliteChapterItemRepository::try_new(&conn).unwrap();

    let doomed = books.create_book(&NewBook::new("Doomed")).unwrap();
    let kept = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "Kept"))
        .unwrap();
    items
        .create_chapter_item(&NewChapterItem::new(kept.id, "stays", ItemState::Idea))
        .unwrap();
    for title in ["A", "B"] {
        let chapter = chapters
            .create_chapter(&NewChapter::new(doomed.id, title))
            .unwrap();
        items
            .create_chapter_item(&NewChapterItem::new(chapter.id, "goes", ItemState::Done))
            .unwrap();
    }

    books.delete_book(doomed.id).unwrap();

    assert!(chapters.list_chapters(doomed.id).unwrap().is_empty());
    assert_eq!(count_rows(&conn, "chapter"), 1);
    assert_eq!(count_rows(&conn, "chapter_item"), 1);
    assert_eq!(items.list_chapter_items(kept.id).unwrap().len(), 1);
}

#[test]
fn chapters_of_other_books_are_not_counted() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let chapters = SqliteChapterRepository::try_new(&conn).unwrap();
    let items = SqliteChapterItemRepository::try_new(&conn).unwrap();

    let other = books.create_book(&NewBook::new("Other")).unwrap();
    let foreign = chapters
        .create_chapter(&NewChapter::new(other.id, "Foreign"))
        .unwrap();
    items
        .create_chapter_item(&NewChapterItem::new(foreign.id, "z", ItemState::Idea))
        .unwrap();
    let own = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "Own"))
        .unwrap();

    let listed = chapters.get_chapters_with_counters(DEMO_BOOK_ID).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), own.id);
    assert_eq!(listed[0].counters.total(), 0);
}

#[test]
fn counter_sums_track_item_rows_through_mixed_edits() {
    let conn = open_db_in_memory().unwrap();
    let chapters = SqliteChapterRepository::try_new(&conn).unwrap();
    let items = SqliteChapterItemRepository::try_new(&conn).unwrap();

    let first = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "First"))
        .unwrap();
    let second = chapters
        .create_chapter(&NewChapter::new(DEMO_BOOK_ID, "Second"))
        .unwrap();

    let mut created = Vec::new();
    for (index, state) in ItemState::ALL.iter().cycle().take(9).enumerate() {
        let chapter_id = if index % 2 == 0 { first.id } else { second.id };
        let item = items
            .create_chapter_item(&NewChapterItem::new(
                chapter_id,
                format!("item {index}"),
                *state,
            ))
            .unwrap();
        created.push(item);
    }
    items
        .edit_chapter_item(created[0].id, &ChapterItemPatch::state(ItemState::Done))
        .unwrap();
    items
        .edit_chapter_item(
            created[1].id,
            &ChapterItemPatch {
                chapter_id: Some(first.id),
                ..ChapterItemPatch::default()
            },
        )
        .unwrap();
    items.delete_chapter_item(created[2].id).unwrap();

    for listed in chapters.get_chapters_with_counters(DEMO_BOOK_ID).unwrap() {
        let rows = items.list_chapter_items(listed.id()).unwrap();
        assert_eq!(listed.counters.total() as usize, rows.len());
        for state in ItemState::ALL {
            let expected = rows.iter().filter(|item| item.state == state).count();
            assert_eq!(listed.counters.get(state) as usize, expected);
        }
    }
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

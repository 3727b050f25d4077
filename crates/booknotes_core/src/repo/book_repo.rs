//! Book repository contract and SQLite implementation.
//!
//! # Invariants
//! - Writes call `validate()` before any SQL mutation.
//! - Deleting a book removes its chapters and items through the schema's
//!   cascading foreign keys.

use crate::db::verify_schema;
use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::repo::{not_found, run, EntityKind, RepoErrorKind, RepoOperation, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT id, title FROM book";

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Lists every book in primary key order.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn get_book(&self, id: BookId) -> RepoResult<Book>;
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    /// Applies a partial edit and returns the stored row.
    fn edit_book(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        run(RepoOperation::Connect, || {
            verify_schema(conn)?;
            Ok(Self { conn })
        })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn list_books(&self) -> RepoResult<Vec<Book>> {
        run(RepoOperation::ListBooks, || {
            let mut stmt = self
                .conn
                .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut books = Vec::new();
            while let Some(row) = rows.next()? {
                books.push(parse_book_row(row)?);
            }
            Ok(books)
        })
    }

    fn get_book(&self, id: BookId) -> RepoResult<Book> {
        run(RepoOperation::GetBook, || load_book(self.conn, id))
    }

    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        run(RepoOperation::CreateBook, || {
            book.validate()?;
            self.conn
                .execute("INSERT INTO book (title) VALUES (?1);", [book.title.as_str()])?;
            Ok(Book {
                id: self.conn.last_insert_rowid(),
                title: book.title.clone(),
            })
        })
    }

    fn edit_book(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        run(RepoOperation::EditBook, || {
            let tx = self.conn.unchecked_transaction()?;
            let edited = patch.apply_to(&load_book(&tx, id)?);
            edited.validate()?;

            let changed = tx.execute(
                "UPDATE book SET title = ?1 WHERE id = ?2;",
                params![edited.title.as_str(), id],
            )?;
            if changed == 0 {
                return Err(not_found(EntityKind::Book, id));
            }

            tx.commit()?;
            Ok(edited)
        })
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        run(RepoOperation::DeleteBook, || {
            let changed = self.conn.execute("DELETE FROM book WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(not_found(EntityKind::Book, id));
            }
            Ok(())
        })
    }
}

fn load_book(conn: &Connection, id: BookId) -> Result<Book, RepoErrorKind> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
    let book = stmt
        .query_row([id], |row| Ok(parse_book_row(row)))
        .optional()?
        .ok_or_else(|| not_found(EntityKind::Book, id))??;
    Ok(book)
}

fn parse_book_row(row: &Row<'_>) -> Result<Book, RepoErrorKind> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
    };
    book.validate()?;
    Ok(book)
}

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured database and print books with chapter counters.
//! - Exercise config, logging, repositories and store end to end.

use booknotes_core::{
    core_version, init_logging, open_db, CoreConfig, FetchOutcome, SqliteBookRepository,
    SqliteChapterRepository, Store,
};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }
    info!(
        "event=cli_run module=cli status=start db_path={}",
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    let books = SqliteBookRepository::try_new(&conn)?;
    let chapters = SqliteChapterRepository::try_new(&conn)?;

    let mut store = Store::new();
    if store.fetch_books(&books) != FetchOutcome::Loaded {
        return Err("could not load books; see log for details".into());
    }

    println!("booknotes_core version={}", core_version());
    println!("db_path={}", config.db_path.display());

    let listed = store.state().books.list.clone();
    for book in listed {
        println!("book id={} title={:?}", book.id, book.title);

        store.fetch_chapters(&chapters, book.id);
        for entry in &store.state().chapters.list {
            let counters = &entry.counters;
            println!(
                "  chapter id={} title={:?} idea={} in_progress={} done={}",
                entry.id(),
                entry.chapter.title,
                counters.count_idea,
                counters.count_in_progress,
                counters.count_done
            );
        }
        store.reset_chapters();
    }

    info!("event=cli_run module=cli status=ok");
    Ok(())
}

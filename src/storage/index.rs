//! SQLite crawl index
//!
//! The index is written once, when a crawl finishes, and replaces any index
//! left by a previous run.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::StorageResult;
use crate::storage::{PageRecord, RunRecord};
use crate::url::PageKind;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

/// Writer for a fresh crawl index file
pub struct SqliteIndex {
    conn: Connection,
}

impl SqliteIndex {
    /// Creates a new, empty index at `path`
    ///
    /// Any existing file at `path` is removed first.
    pub fn create(path: &Path) -> StorageResult<Self> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory index (for testing)
    #[cfg(test)]
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Writes the run row and every page row in one transaction
    pub fn write_run(&mut self, run: &RunRecord, pages: &[PageRecord]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO crawl_runs (base_url, started_at, finished_at, config_hash, seed_count, pages_visited, queue_remaining)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run.base_url,
                run.started_at,
                run.finished_at,
                run.config_hash,
                run.seed_count as i64,
                run.pages_visited as i64,
                run.queue_remaining as i64,
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO pages (id, url, file, title, category, author, description, path, kind, from_sitemap, links_found, new_links_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for page in pages {
                stmt.execute(params![
                    page.id as i64,
                    page.url,
                    page.file,
                    page.title,
                    page.category,
                    page.author,
                    page.description,
                    page.path,
                    page.kind.to_db_string(),
                    page.from_sitemap,
                    page.links_found as i64,
                    page.new_links_added as i64,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    fn read_records(&self) -> StorageResult<Vec<PageRecord>> {
        read_records(&self.conn)
    }
}

fn open_read_only(path: &Path) -> StorageResult<Connection> {
    Ok(Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY,
    )?)
}

fn read_records(conn: &Connection) -> StorageResult<Vec<PageRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, url, file, title, category, author, description, path, kind, from_sitemap, links_found, new_links_added
         FROM pages ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        let kind: String = row.get(8)?;
        let kind = PageKind::from_db_string(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                8,
                Type::Text,
                format!("unknown page kind {:?}", kind).into(),
            )
        })?;

        Ok(PageRecord {
            id: row.get::<_, i64>(0)? as u64,
            url: row.get(1)?,
            file: row.get(2)?,
            title: row.get(3)?,
            category: row.get(4)?,
            author: row.get(5)?,
            description: row.get(6)?,
            path: row.get(7)?,
            kind,
            from_sitemap: row.get(9)?,
            links_found: row.get::<_, i64>(10)? as usize,
            new_links_added: row.get::<_, i64>(11)? as usize,
        })
    })?;

    let records = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Loads every page record from an exported index, ordered by id
pub fn load_records(path: &Path) -> StorageResult<Vec<PageRecord>> {
    let conn = open_read_only(path)?;
    read_records(&conn)
}

/// Loads the run row of an exported index, if one was written
pub fn load_run(path: &Path) -> StorageResult<Option<RunRecord>> {
    let conn = open_read_only(path)?;
    let run = conn
        .query_row(
            "SELECT base_url, started_at, finished_at, config_hash, seed_count, pages_visited, queue_remaining
             FROM crawl_runs ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                Ok(RunRecord {
                    base_url: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    seed_count: row.get::<_, i64>(4)? as usize,
                    pages_visited: row.get::<_, i64>(5)? as usize,
                    queue_remaining: row.get::<_, i64>(6)? as usize,
                })
            },
        )
        .optional()?;
    Ok(run)
}

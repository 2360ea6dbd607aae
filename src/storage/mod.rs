//! Storage module for persisting crawl output
//!
//! This module handles everything the crawler writes to disk:
//! - Raw HTML of each crawled page, one file per page
//! - The append-only error log
//! - The SQLite crawl index exported when a crawl finishes

mod crawl_log;
mod index;
mod pages;
mod schema;
mod traits;

pub use crawl_log::CrawlLog;
pub use index::{load_records, load_run, SqliteIndex};
pub use pages::{derive_filename, HtmlDirectory};
pub use traits::{PageStore, StorageError, StorageResult};

use crate::url::PageKind;

/// One successfully crawled HTML page
///
/// Records are immutable once created. `id` is the 1-based crawl sequence
/// number, assigned in the order pages finished parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub id: u64,
    pub url: String,
    pub file: String,
    pub title: String,
    pub category: String,
    pub author: String,
    pub description: String,
    pub path: String,
    pub kind: PageKind,
    pub from_sitemap: bool,
    pub links_found: usize,
    pub new_links_added: usize,
}

/// Represents an exported crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub config_hash: String,
    pub seed_count: usize,
    pub pages_visited: usize,
    pub queue_remaining: usize,
}

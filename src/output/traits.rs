//! Output error and summary types
//!
//! This module defines the summary derived from a finished crawl, shared by
//! the console and markdown renderers.

use crate::crawler::CrawlReport;
use crate::storage::{PageRecord, RunRecord};
use crate::url::PageKind;
use chrono::DateTime;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// How many entries the "top" lists keep
const TOP_N: usize = 10;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary statistics for a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    // Run metadata
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: Option<u64>,
    pub config_hash: String,

    // Overall statistics
    pub total_crawled: usize,
    pub from_sitemap: usize,
    pub from_links: usize,
    pub categories: usize,
    pub authors: usize,
    pub seed_count: usize,
    pub pages_visited: usize,
    pub pages_skipped: usize,
    pub queue_remaining: usize,
    pub total_links_found: usize,

    // Page kind breakdown
    pub by_kind: BTreeMap<PageKind, usize>,

    // Most frequent categories and authors with page counts
    pub top_categories: Vec<(String, usize)>,
    pub top_authors: Vec<(String, usize)>,
}

impl CrawlSummary {
    /// Summarizes a finished crawl
    pub fn from_report(report: &CrawlReport, base_url: &str, config_hash: &str) -> Self {
        Self::from_records(&report.records, &report.run_record(base_url, config_hash))
    }

    /// Summarizes exported records and their run row
    ///
    /// Empty category and author values are not counted as distinct values.
    pub fn from_records(records: &[PageRecord], run: &RunRecord) -> Self {
        let from_sitemap = records.iter().filter(|r| r.from_sitemap).count();

        let mut by_kind = BTreeMap::new();
        for record in records {
            *by_kind.entry(record.kind).or_insert(0) += 1;
        }

        let categories: HashSet<&str> = records
            .iter()
            .map(|r| r.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        let authors: HashSet<&str> = records
            .iter()
            .map(|r| r.author.as_str())
            .filter(|a| !a.is_empty())
            .collect();

        Self {
            base_url: run.base_url.clone(),
            started_at: run.started_at.clone(),
            finished_at: run.finished_at.clone(),
            duration_seconds: duration_seconds(&run.started_at, &run.finished_at),
            config_hash: run.config_hash.clone(),
            total_crawled: records.len(),
            from_sitemap,
            from_links: records.len() - from_sitemap,
            categories: categories.len(),
            authors: authors.len(),
            seed_count: run.seed_count,
            pages_visited: run.pages_visited,
            pages_skipped: run.pages_visited.saturating_sub(records.len()),
            queue_remaining: run.queue_remaining,
            total_links_found: records.iter().map(|r| r.links_found).sum(),
            by_kind,
            top_categories: top_values(records.iter().map(|r| r.category.as_str())),
            top_authors: top_values(records.iter().map(|r| r.author.as_str())),
        }
    }

    /// Share of visited URLs that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.total_crawled as f64 / self.pages_visited as f64) * 100.0
    }
}

fn duration_seconds(started_at: &str, finished_at: &str) -> Option<u64> {
    let started = DateTime::parse_from_rfc3339(started_at).ok()?;
    let finished = DateTime::parse_from_rfc3339(finished_at).ok()?;
    u64::try_from((finished - started).num_seconds()).ok()
}

/// Counts non-empty values, most frequent first, ties by name
fn top_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_empty()) {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(TOP_N);
    sorted
}

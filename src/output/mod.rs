//! Output module for generating crawl summaries and reports
//!
//! This module handles:
//! - Deriving summary counts from crawl records
//! - Printing the console summary
//! - Generating the markdown summary file

mod markdown;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::print_summary;
pub use traits::{CrawlSummary, OutputError, OutputResult};

use crate::storage::{load_records, load_run};
use crate::CrawlerError;
use std::path::Path;

/// Generates a crawl summary from an exported index
///
/// # Arguments
///
/// * `index_path` - Path to the SQLite index written by a previous crawl
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Successfully generated summary
/// * `Err(CrawlerError)` - Index missing, unreadable, or without a run row
pub fn load_summary(index_path: &Path) -> Result<CrawlSummary, CrawlerError> {
    let run = load_run(index_path)?.ok_or_else(|| {
        OutputError::Format(format!(
            "No crawl run found in {}",
            index_path.display()
        ))
    })?;
    let records = load_records(index_path)?;

    Ok(CrawlSummary::from_records(&records, &run))
}

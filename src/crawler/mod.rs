//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Sitemap seeding
//! - HTTP fetching with per-request timeouts
//! - Link and metadata extraction
//! - The breadth-first frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod metadata;
mod parser;
mod sitemap;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_document, fetch_page, FetchResult};
pub use frontier::Frontier;
pub use metadata::{extract_metadata, PageMetadata};
pub use parser::{ExtractedLinks, LinkExtractor};
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapError, SitemapSeeder};

use crate::config::Config;
use crate::output::{generate_markdown_summary, print_summary, CrawlSummary};
use crate::storage::SqliteIndex;
use crate::CrawlerError;
use std::path::Path;
use tracing::{info, warn};

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the pages directory and open the error log
/// 2. Seed the frontier from the sitemap and the base URL
/// 3. Fetch pages breadth-first until the frontier drains or the budget is spent
/// 4. Export the crawl index
/// 5. Write the markdown summary and print the console summary
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the config file, recorded with the run
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed and the index was exported
/// * `Err(CrawlerError)` - Startup or index export failed
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<CrawlReport, CrawlerError> {
    let base_url = config.crawler.base_url.clone();
    let output = config.output.clone();

    let mut coordinator = Coordinator::new(config)?;
    let report = coordinator.run().await?;

    let index_path = Path::new(&output.index_path);
    let mut index = SqliteIndex::create(index_path)?;
    index.write_run(&report.run_record(&base_url, config_hash), &report.records)?;
    info!(
        "Index saved to {} ({} pages)",
        index_path.display(),
        report.records.len()
    );

    let summary = CrawlSummary::from_report(&report, &base_url, config_hash);
    let summary_path = Path::new(&output.summary_path);
    match generate_markdown_summary(&summary, summary_path) {
        Ok(()) => info!("Summary written to {}", summary_path.display()),
        Err(e) => warn!(
            "Failed to write summary to {}: {}",
            summary_path.display(),
            e
        ),
    }

    print_summary(&summary);
    Ok(report)
}

//! Console summary output
//!
//! This module prints crawl summaries to stdout, either right after a crawl
//! or from a previously exported index.

use crate::output::traits::CrawlSummary;

const RULE: &str = "============================================================";

/// Prints a crawl summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("\n{}", RULE);
    println!("CRAWL COMPLETE");
    println!("{}", RULE);
    println!("  Site          : {}", summary.base_url);
    println!("  Pages crawled : {}", summary.total_crawled);
    println!("  From sitemap  : {}", summary.from_sitemap);
    println!("  From links    : {}", summary.from_links);
    println!("  Categories    : {}", summary.categories);
    println!("  Authors       : {}", summary.authors);
    println!("  Queue remain  : {}", summary.queue_remaining);
    println!(
        "  Visited       : {} ({} skipped or failed, {:.1}% crawled)",
        summary.pages_visited,
        summary.pages_skipped,
        summary.success_rate()
    );

    if !summary.by_kind.is_empty() {
        println!();
        println!("Pages by kind:");
        for (kind, count) in &summary.by_kind {
            println!("  {:<10} {}", kind, count);
        }
    }

    if !summary.top_categories.is_empty() {
        println!();
        println!("Top categories:");
        for (category, count) in &summary.top_categories {
            println!("  {:>5}  {}", count, category);
        }
    }

    if let Some(duration) = summary.duration_seconds {
        println!();
        println!("Total time: {}s", duration);
    }
}

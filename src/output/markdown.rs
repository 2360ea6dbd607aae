//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including page counts, the page kind breakdown, and the most frequent
//! categories and authors.

use crate::output::traits::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary from crawl statistics
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
///
/// # Arguments
///
/// * `summary` - The crawl summary data
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Portal Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", summary.base_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Crawled**: {}\n", summary.total_crawled));
    md.push_str(&format!("- **From Sitemap**: {}\n", summary.from_sitemap));
    md.push_str(&format!("- **From Links**: {}\n", summary.from_links));
    md.push_str(&format!("- **Categories**: {}\n", summary.categories));
    md.push_str(&format!("- **Authors**: {}\n", summary.authors));
    md.push_str(&format!("- **Seed URLs**: {}\n", summary.seed_count));
    md.push_str(&format!("- **URLs Visited**: {}\n", summary.pages_visited));
    md.push_str(&format!("- **Skipped or Failed**: {}\n", summary.pages_skipped));
    md.push_str(&format!("- **Queue Remaining**: {}\n", summary.queue_remaining));
    md.push_str(&format!(
        "- **Links Found**: {}\n",
        summary.total_links_found
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    // Kind breakdown
    if !summary.by_kind.is_empty() {
        md.push_str("## Page Kinds\n\n");
        md.push_str("| Kind | Pages |\n");
        md.push_str("|------|-------|\n");
        for (kind, count) in &summary.by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    push_top_table(&mut md, "Top Categories", "Category", &summary.top_categories);
    push_top_table(&mut md, "Top Authors", "Author", &summary.top_authors);

    md.push_str("---\n\n");
    md.push_str(&format!(
        "*Generated by portal-crawler at {}*\n",
        chrono::Utc::now().to_rfc3339()
    ));

    md
}

fn push_top_table(md: &mut String, heading: &str, column: &str, rows: &[(String, usize)]) {
    if rows.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", heading));
    md.push_str(&format!("| {} | Pages |\n", column));
    md.push_str("|------|-------|\n");
    for (value, count) in rows {
        // Pipes would break the table
        md.push_str(&format!("| {} | {} |\n", value.replace('|', "\\|"), count));
    }
    md.push('\n');
}

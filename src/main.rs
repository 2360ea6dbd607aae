//! Portal Crawler main entry point
//!
//! This is the command-line interface for the hybrid sitemap + BFS crawler.

use anyhow::{Context, Result};
use clap::Parser;
use portal_crawler::config::{load_config_with_hash, Config};
use portal_crawler::crawler::run_crawl;
use portal_crawler::output::{generate_markdown_summary, load_summary, print_summary};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Portal Crawler: a hybrid sitemap + breadth-first site crawler
///
/// Seeds the crawl from the site's sitemap, follows same-host links
/// breadth-first, stores every HTML page, and exports an index of page
/// metadata (title, category, author, description).
#[derive(Parser, Debug)]
#[command(name = "portal-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A hybrid sitemap + BFS site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the page budget from the config file
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_pages: Option<u64>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from an existing crawl index and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Generate markdown summary from an existing crawl index and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages as usize;
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.export_summary {
        handle_export_summary(&config)
    } else {
        handle_crawl(config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("portal_crawler=info,warn"),
            1 => EnvFilter::new("portal_crawler=debug,info"),
            2 => EnvFilter::new("portal_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    let base = Url::parse(&config.crawler.base_url).context("Base URL is not a valid URL")?;
    let sitemap = base
        .join(&config.crawler.sitemap_path)
        .context("Sitemap path is not valid below the base URL")?;

    println!("=== Portal Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Sitemap: {}", sitemap);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Sub-sitemap delay: {}ms", config.crawler.sitemap_delay_ms);
    println!(
        "  Timeouts: page {}s, sitemap {}s",
        config.crawler.page_timeout_secs, config.crawler.sitemap_timeout_secs
    );
    println!("  User agent: {}", config.crawler.user_agent);
    println!(
        "  Skipped extensions: {}",
        config.crawler.skip_extensions.join(" ")
    );

    println!("\nClassification:");
    println!("  Author: {}", config.classify.author_prefixes.join(", "));
    println!("  Category: {}", config.classify.category_prefixes.join(", "));
    println!("  Tag: {}", config.classify.tag_prefixes.join(", "));

    println!("\nOutput:");
    println!("  Pages: {}", config.output.pages_dir);
    println!("  Index: {}", config.output.index_path);
    println!("  Summary: {}", config.output.summary_path);
    println!("  Error log: {}", config.output.log_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would seed from {} and crawl up to {} pages on {}",
        sitemap,
        config.crawler.max_pages,
        base.host_str().unwrap_or_default()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the crawl index
fn handle_stats(config: &Config) -> Result<()> {
    println!("Index: {}", config.output.index_path);

    let summary = load_summary(Path::new(&config.output.index_path))
        .with_context(|| format!("Failed to read crawl index {}", config.output.index_path))?;
    print_summary(&summary);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> Result<()> {
    println!("=== Exporting Crawl Summary ===\n");
    println!("Index: {}", config.output.index_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    tracing::info!("Loading crawl data from index...");
    let summary = load_summary(Path::new(&config.output.index_path))
        .with_context(|| format!("Failed to read crawl index {}", config.output.index_path))?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))
        .with_context(|| format!("Failed to write {}", config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> Result<()> {
    tracing::info!(
        "Crawling {} (max pages: {}, output: {})",
        config.crawler.base_url,
        config.crawler.max_pages,
        config.output.pages_dir
    );

    let report = run_crawl(config, config_hash).await.context("Crawl failed")?;
    tracing::info!(
        "Crawl completed successfully: {} pages indexed",
        report.records.len()
    );

    Ok(())
}

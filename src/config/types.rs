use serde::Deserialize;

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default hard cap on visited pages
pub const DEFAULT_MAX_PAGES: usize = 2000;

/// File extensions that never point at crawlable content
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".zip", ".rar", ".mp4", ".svg", ".webp", ".ico",
    ".css", ".js", ".woff", ".woff2", ".ttf",
];

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
}

impl Config {
    /// Builds a configuration for `base_url` with every other setting at its default
    pub fn for_site(base_url: &str) -> Self {
        Self {
            crawler: CrawlerConfig::for_site(base_url),
            output: OutputConfig::default(),
            classify: ClassifyConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Site root; the sitemap is resolved against it and only its host is crawled
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum number of pages to visit (successful or not)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Number of fetches allowed in flight at once
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: u32,

    /// Politeness delay after every page fetch (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Pause between sub-sitemap fetches (milliseconds)
    #[serde(rename = "sitemap-delay-ms", default = "default_sitemap_delay_ms")]
    pub sitemap_delay_ms: u64,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Timeout for a single sitemap fetch (seconds)
    #[serde(
        rename = "sitemap-timeout-secs",
        default = "default_sitemap_timeout_secs"
    )]
    pub sitemap_timeout_secs: u64,

    /// Sitemap location relative to the base URL
    #[serde(rename = "sitemap-path", default = "default_sitemap_path")]
    pub sitemap_path: String,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Link targets with these extensions are never queued
    #[serde(rename = "skip-extensions", default = "default_skip_extensions")]
    pub skip_extensions: Vec<String>,
}

impl CrawlerConfig {
    fn for_site(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            max_pages: default_max_pages(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            request_delay_ms: default_request_delay_ms(),
            sitemap_delay_ms: default_sitemap_delay_ms(),
            page_timeout_secs: default_page_timeout_secs(),
            sitemap_timeout_secs: default_sitemap_timeout_secs(),
            sitemap_path: default_sitemap_path(),
            user_agent: default_user_agent(),
            skip_extensions: default_skip_extensions(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one HTML file per crawled page
    #[serde(rename = "pages-dir", default = "default_pages_dir")]
    pub pages_dir: String,

    /// Path to the exported SQLite crawl index
    #[serde(rename = "index-path", default = "default_index_path")]
    pub index_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,

    /// Append-only log of fetch and sitemap errors
    #[serde(rename = "log-path", default = "default_log_path")]
    pub log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            index_path: default_index_path(),
            summary_path: default_summary_path(),
            log_path: default_log_path(),
        }
    }
}

/// Path prefixes used to classify crawled pages
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    #[serde(rename = "author-prefixes", default = "default_author_prefixes")]
    pub author_prefixes: Vec<String>,

    #[serde(rename = "category-prefixes", default = "default_category_prefixes")]
    pub category_prefixes: Vec<String>,

    #[serde(rename = "tag-prefixes", default = "default_tag_prefixes")]
    pub tag_prefixes: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            author_prefixes: default_author_prefixes(),
            category_prefixes: default_category_prefixes(),
            tag_prefixes: default_tag_prefixes(),
        }
    }
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_max_concurrent_fetches() -> u32 {
    1
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_sitemap_delay_ms() -> u64 {
    200
}

fn default_page_timeout_secs() -> u64 {
    45
}

fn default_sitemap_timeout_secs() -> u64 {
    30
}

fn default_sitemap_path() -> String {
    "sitemap.xml".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_skip_extensions() -> Vec<String> {
    DEFAULT_SKIP_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_pages_dir() -> String {
    "Crawled_Data".to_string()
}

fn default_index_path() -> String {
    "crawled_index.db".to_string()
}

fn default_summary_path() -> String {
    "crawl_summary.md".to_string()
}

fn default_log_path() -> String {
    "crawler.log".to_string()
}

fn default_author_prefixes() -> Vec<String> {
    vec!["/author/".to_string()]
}

fn default_category_prefixes() -> Vec<String> {
    vec!["/category/".to_string()]
}

fn default_tag_prefixes() -> Vec<String> {
    vec!["/tag/".to_string()]
}

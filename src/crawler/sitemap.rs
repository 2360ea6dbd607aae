//! Sitemap seeding
//!
//! Seeds come from the site's `sitemap.xml`, which is either a flat
//! `<urlset>` or a `<sitemapindex>` pointing at sub-sitemaps. Index files
//! are followed one level deep only. Every failure here is non-fatal: the
//! crawl falls back to link discovery from the base URL.

use crate::crawler::fetcher::fetch_document;
use crate::storage::CrawlLog;
use crate::url::{normalize_url, NormalizedUrl};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Errors while fetching or parsing a sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Sitemap {url} returned HTTP {status_code}")]
    Http { url: String, status_code: u16 },

    #[error("Sitemap {url} could not be fetched: {error}")]
    Network { url: String, error: String },

    #[error("Sitemap {url} could not be parsed: {error}")]
    Parse { url: String, error: String },
}

/// Raw shape shared by `<urlset>` and `<sitemapindex>`
#[derive(Debug, Deserialize)]
struct RawSitemap {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<Loc>,

    #[serde(rename = "url", default)]
    urls: Vec<Loc>,
}

#[derive(Debug, Deserialize)]
struct Loc {
    #[serde(default)]
    loc: String,
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of sub-sitemaps
    Index(Vec<String>),

    /// `<urlset>`: page locations
    UrlSet(Vec<String>),
}

/// Parses sitemap XML into its locations
///
/// Locations are trimmed and empty ones dropped. A document with any
/// `<sitemap>` entries is treated as an index.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, quick_xml::DeError> {
    let raw: RawSitemap = quick_xml::de::from_str(xml)?;

    let locs = |entries: Vec<Loc>| -> Vec<String> {
        entries
            .into_iter()
            .map(|entry| entry.loc.trim().to_string())
            .filter(|loc| !loc.is_empty())
            .collect()
    };

    if raw.sitemaps.is_empty() {
        Ok(SitemapDocument::UrlSet(locs(raw.urls)))
    } else {
        Ok(SitemapDocument::Index(locs(raw.sitemaps)))
    }
}

/// Collects the seed set from a site's sitemap
pub struct SitemapSeeder {
    client: Client,
    sitemap_path: String,
    timeout: Duration,
    delay: Duration,
    log: Arc<CrawlLog>,
}

impl SitemapSeeder {
    /// Creates a seeder
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `sitemap_path` - Sitemap location, relative to the base URL
    /// * `timeout` - Per-request timeout for each sitemap document
    /// * `delay` - Pause after each sub-sitemap fetch
    /// * `log` - Error log for failures
    pub fn new(
        client: Client,
        sitemap_path: impl Into<String>,
        timeout: Duration,
        delay: Duration,
        log: Arc<CrawlLog>,
    ) -> Self {
        Self {
            client,
            sitemap_path: sitemap_path.into(),
            timeout,
            delay,
            log,
        }
    }

    /// Fetches the sitemap below `base` and returns every normalized page URL
    ///
    /// Returns an empty set if the root sitemap is missing or unparsable.
    /// Sub-sitemaps that fail are logged and skipped.
    pub async fn collect_seeds(&self, base: &Url) -> BTreeSet<NormalizedUrl> {
        let mut seeds = BTreeSet::new();

        let sitemap_url = match base.join(&self.sitemap_path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                self.report(&format!(
                    "Sitemap path {:?} is not valid below {}: {}",
                    self.sitemap_path, base, e
                ));
                return seeds;
            }
        };

        info!("Fetching sitemap {}", sitemap_url);
        let document = match self.fetch_and_parse(&sitemap_url).await {
            Ok(document) => document,
            Err(e) => {
                self.report(&e.to_string());
                return seeds;
            }
        };

        match document {
            SitemapDocument::UrlSet(locs) => {
                seeds.extend(locs.iter().map(|loc| normalize_url(loc)));
            }
            SitemapDocument::Index(subs) => {
                info!("Sitemap index lists {} sub-sitemaps", subs.len());
                for sub in &subs {
                    self.collect_sub_sitemap(sub, &mut seeds).await;
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }

        info!("Collected {} seed URLs from sitemap", seeds.len());
        seeds
    }

    async fn collect_sub_sitemap(&self, url: &str, seeds: &mut BTreeSet<NormalizedUrl>) {
        match self.fetch_and_parse(url).await {
            Ok(SitemapDocument::UrlSet(locs)) => {
                debug!("Sub-sitemap {} lists {} URLs", url, locs.len());
                seeds.extend(locs.iter().map(|loc| normalize_url(loc)));
            }
            Ok(SitemapDocument::Index(nested)) => {
                debug!(
                    "Sub-sitemap {} is itself an index ({} entries), not following",
                    url,
                    nested.len()
                );
            }
            Err(e) => self.report(&e.to_string()),
        }
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<SitemapDocument, SitemapError> {
        let body = fetch_document(&self.client, url, self.timeout).await?;
        parse_sitemap(&body).map_err(|e| SitemapError::Parse {
            url: url.to_string(),
            error: e.to_string(),
        })
    }

    fn report(&self, message: &str) {
        warn!("{}", message);
        self.log.record(message);
    }
}

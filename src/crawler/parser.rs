//! HTML link extraction
//!
//! This module handles parsing HTML content to extract:
//! - Every distinct link target on the page (counted as `links_found`)
//! - The subset the crawler may follow: same host, not a skipped file type

use crate::url::{has_skipped_extension, host_key, normalize_url, NormalizedUrl};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Links extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Number of distinct http(s) targets, before host and extension filters
    pub discovered: usize,

    /// Normalized targets the crawler may enqueue
    pub follow: BTreeSet<NormalizedUrl>,
}

/// Extracts followable links for a single-host crawl
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    host: Option<String>,
    skip_extensions: Vec<String>,
}

impl LinkExtractor {
    /// Creates an extractor that follows links on `base`'s host only
    ///
    /// # Arguments
    ///
    /// * `base` - The crawl base URL
    /// * `skip_extensions` - File extensions (with leading dot) never followed
    pub fn new(base: &Url, skip_extensions: &[String]) -> Self {
        Self {
            host: host_key(base),
            skip_extensions: skip_extensions.to_vec(),
        }
    }

    /// Extracts links from `html`, resolving relative hrefs against `page_url`
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href="...">` with relative, protocol-relative or absolute targets
    ///
    /// **Exclude:**
    /// - `javascript:`, `mailto:`, `tel:` links
    /// - Data URIs
    /// - Fragment-only and empty hrefs
    /// - Non-HTTP(S) URLs after resolution
    ///
    /// # Example
    ///
    /// ```
    /// use portal_crawler::crawler::LinkExtractor;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.com/").unwrap();
    /// let extractor = LinkExtractor::new(&base, &[".png".to_string()]);
    /// let html = r#"<a href="/post">Post</a><a href="/logo.png">Logo</a>"#;
    ///
    /// let links = extractor.extract_links(html, &base);
    /// assert_eq!(links.discovered, 2);
    /// assert_eq!(links.follow.len(), 1);
    /// ```
    pub fn extract_links(&self, html: &str, page_url: &Url) -> ExtractedLinks {
        let document = Html::parse_document(html);
        let mut targets = BTreeSet::new();
        let mut follow = BTreeSet::new();

        let Ok(a_selector) = Selector::parse("a[href]") else {
            return ExtractedLinks::default();
        };

        for element in document.select(&a_selector) {
            let Some(target) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, page_url))
            else {
                continue;
            };

            let normalized = normalize_url(target.as_str());
            if !targets.insert(normalized.clone()) {
                continue;
            }

            if self.is_followable(&target) {
                follow.insert(normalized);
            }
        }

        ExtractedLinks {
            discovered: targets.len(),
            follow,
        }
    }

    fn is_followable(&self, target: &Url) -> bool {
        self.host.is_some()
            && host_key(target) == self.host
            && !has_skipped_extension(target.path(), &self.skip_extensions)
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

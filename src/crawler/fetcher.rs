//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a browser-like user agent
//! - GET requests for pages, with a per-request timeout
//! - GET requests for sitemap documents
//! - Error classification

use crate::config::CrawlerConfig;
use crate::crawler::sitemap::SitemapError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Connect timeout applied to every request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// True if the request ran out of time
        timed_out: bool,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy. Timeouts are set
/// per request, since pages and sitemaps use different limits.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use portal_crawler::config::Config;
/// use portal_crawler::crawler::build_http_client;
///
/// let config = Config::for_site("https://example.com/");
/// let client = build_http_client(&config.crawler).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and classifies the response
///
/// Only a `200 OK` whose Content-Type contains `text/html`, in any case,
/// counts as success. Nothing is retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Limit for the whole request, body included
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { final_url, body },
        Err(e) => classify_error(e),
    }
}

/// Fetches a sitemap document body
///
/// The Content-Type is not checked; servers label sitemaps inconsistently.
///
/// # Returns
///
/// * `Ok(String)` - Body of a `200 OK` response
/// * `Err(SitemapError::Http)` - Any other status
/// * `Err(SitemapError::Network)` - Transport failure or timeout
pub async fn fetch_document(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<String, SitemapError> {
    let network = |e: reqwest::Error| SitemapError::Network {
        url: url.to_string(),
        error: describe_error(&e),
    };

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(network)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(SitemapError::Http {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    response.text().await.map_err(network)
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    FetchResult::NetworkError {
        error: describe_error(&e),
        timed_out: e.is_timeout(),
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}

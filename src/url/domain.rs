use url::Url;

/// Extracts the host key used for the same-host filter
///
/// The key is the lowercase host plus any non-default port, so
/// `https://site.test/` and `https://SITE.test:443/x` share a key while
/// `http://127.0.0.1:8080/` and `http://127.0.0.1:9090/` do not.
///
/// # Returns
///
/// * `Some(String)` - The `host[:port]` key
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use portal_crawler::url::host_key;
///
/// let url = Url::parse("https://Site.test/path").unwrap();
/// assert_eq!(host_key(&url), Some("site.test".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

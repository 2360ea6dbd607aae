use std::fmt;
use url::Url;

/// A URL reduced to `scheme://authority/path`, the crawl's dedup identity
///
/// Query strings and fragments are dropped, and a path whose last segment has
/// no extension always ends in `/`. Two URLs differing only in those details
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path component, always starting with `/` unless it is empty
    pub fn path(&self) -> &str {
        let rest = match self.0.find("://") {
            Some(idx) => &self.0[idx + 3..],
            None => &self.0,
        };
        match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => "",
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a URL to its dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL (host lowercased, path percent-encoded, dot segments resolved)
/// 2. Keep scheme, host and any non-default port; drop userinfo
/// 3. Drop the query string and the fragment
/// 4. If the last path segment has no `.`, make sure the path ends in `/`
///
/// Input that does not parse as a hierarchical URL is split on a best-effort
/// basis instead; missing parts become empty strings. This never fails.
///
/// # Examples
///
/// ```
/// use portal_crawler::url::normalize_url;
///
/// assert_eq!(normalize_url("https://Site.test/a/b?x=1#top").as_str(), "https://site.test/a/b/");
/// assert_eq!(normalize_url("https://site.test/a/b.html").as_str(), "https://site.test/a/b.html");
/// ```
pub fn normalize_url(raw: &str) -> NormalizedUrl {
    let raw = raw.trim();

    let (scheme, authority, path) = match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => (
            url.scheme().to_string(),
            authority_of(&url),
            url.path().to_string(),
        ),
        _ => split_loosely(raw),
    };

    NormalizedUrl(format!(
        "{}://{}{}",
        scheme,
        authority,
        with_directory_slash(path)
    ))
}

/// `host[:port]`, with the port present only when it is not the scheme default
fn authority_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Splits an unparseable URL into scheme, authority and path by hand
///
/// The authority is kept verbatim: a scheme-less input comes back as
/// `://<path>`, and its first segment must read the same when that output is
/// split again.
fn split_loosely(raw: &str) -> (String, String, String) {
    let without_fragment = raw.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");

    match without_query.split_once("://") {
        Some((scheme, rest)) => {
            let (authority, path) = match rest.find('/') {
                Some(idx) => (&rest[..idx], &rest[idx..]),
                None => (rest, ""),
            };
            (
                scheme.to_lowercase(),
                authority.to_string(),
                path.to_string(),
            )
        }
        None => (String::new(), String::new(), without_query.to_string()),
    }
}

/// Appends `/` to extension-less paths
fn with_directory_slash(mut path: String) -> String {
    if path.is_empty() || path.ends_with('/') {
        return path;
    }

    let last_segment = path.rsplit('/').next().unwrap_or("");
    if !last_segment.contains('.') {
        path.push('/');
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_trailing_slash_without_extension() {
        let result = normalize_url("http://h/a/b");
        assert_eq!(result.as_str(), "http://h/a/b/");
    }

    #[test]
    fn test_keeps_extension_without_slash() {
        let result = normalize_url("http://h/a/b.html");
        assert_eq!(result.as_str(), "http://h/a/b.html");
    }

    #[test]
    fn test_keeps_existing_trailing_slash() {
        let result = normalize_url("https://site.test/post-1/");
        assert_eq!(result.as_str(), "https://site.test/post-1/");
    }

    #[test]
    fn test_root_path() {
        assert_eq!(normalize_url("https://site.test").as_str(), "https://site.test/");
        assert_eq!(normalize_url("https://site.test/").as_str(), "https://site.test/");
    }

    #[test]
    fn test_drops_query_and_fragment() {
        let result = normalize_url("https://site.test/post-1?utm_source=x&page=2#comments");
        assert_eq!(result.as_str(), "https://site.test/post-1/");
    }

    #[test]
    fn test_trailing_slash_variants_collapse() {
        let a = normalize_url("https://site.test/post-1");
        let b = normalize_url("https://site.test/post-1/");
        let c = normalize_url("https://site.test/post-1#intro");
        let d = normalize_url("https://site.test/post-1/?ref=home");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, d);
    }

    #[test]
    fn test_lowercases_host_but_not_path() {
        let result = normalize_url("https://SITE.Test/Yazar/Ali");
        assert_eq!(result.as_str(), "https://site.test/Yazar/Ali/");
    }

    #[test]
    fn test_keeps_non_default_port() {
        assert_eq!(
            normalize_url("http://127.0.0.1:8080/page").as_str(),
            "http://127.0.0.1:8080/page/"
        );
        assert_eq!(
            normalize_url("https://site.test:443/page").as_str(),
            "https://site.test/page/"
        );
    }

    #[test]
    fn test_dot_in_directory_segment_only() {
        // Only the final segment decides whether a slash is appended
        let result = normalize_url("https://site.test/v1.2/notes");
        assert_eq!(result.as_str(), "https://site.test/v1.2/notes/");
    }

    #[test]
    fn test_malformed_input_is_best_effort() {
        assert_eq!(normalize_url("not a url").as_str(), "://not a url/");
        assert_eq!(normalize_url("").as_str(), "://");
    }

    #[test]
    fn test_scheme_less_input_keeps_case() {
        let once = normalize_url("Foo/bar");
        assert_eq!(once.as_str(), "://Foo/bar/");
        assert_eq!(normalize_url(once.as_str()), once);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "http://h/a/b",
            "http://h/a/b.html",
            "https://site.test",
            "https://SITE.test/x/../y?q=1#f",
            "https://site.test/kategori/dünya",
            "http://127.0.0.1:9000/a/b/c.tar.gz",
            "not a url",
            "mailto:editor@site.test",
            "://loose/path",
            "Foo/bar",
            "://Loose/Path",
            "HTTP://Bad Host/x",
            "",
        ];

        for input in inputs {
            let once = normalize_url(input);
            let twice = normalize_url(once.as_str());
            assert_eq!(once, twice, "normalization not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_path_accessor() {
        assert_eq!(normalize_url("https://site.test/a/b").path(), "/a/b/");
        assert_eq!(normalize_url("https://site.test").path(), "/");
        assert_eq!(normalize_url("http://127.0.0.1:8080/x.html").path(), "/x.html");
    }
}

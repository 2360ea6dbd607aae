/// Checks if a URL path falls under a section prefix
///
/// A prefix written with a trailing slash (`/author/`) also matches the bare
/// section path without one (`/author`), so listing pages classify the same
/// way as the pages below them.
///
/// # Examples
///
/// ```
/// use portal_crawler::url::matches_prefix;
///
/// assert!(matches_prefix("/author/", "/author/asalpan/"));
/// assert!(matches_prefix("/author/", "/author"));
/// assert!(!matches_prefix("/author/", "/authors-wanted/"));
/// ```
pub fn matches_prefix(prefix: &str, path: &str) -> bool {
    if path.starts_with(prefix) {
        return true;
    }

    match prefix.strip_suffix('/') {
        Some(bare) if !bare.is_empty() => path == bare,
        _ => false,
    }
}

/// Returns the lowercase extension of the last path segment, including the dot
///
/// Leading dots do not start an extension (`/.well-known` has none), and a
/// path ending in `/` has none.
pub fn path_extension(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next().unwrap_or("");
    let stem_len = last_segment.trim_start_matches('.').len();
    let trimmed = &last_segment[last_segment.len() - stem_len..];

    trimmed
        .rfind('.')
        .map(|idx| trimmed[idx..].to_lowercase())
}

/// Checks whether a path points at a non-content file type
///
/// # Examples
///
/// ```
/// use portal_crawler::url::has_skipped_extension;
///
/// let skip = vec![".jpg".to_string(), ".pdf".to_string()];
/// assert!(has_skipped_extension("/uploads/photo.JPG", &skip));
/// assert!(!has_skipped_extension("/article-five/", &skip));
/// ```
pub fn has_skipped_extension(path: &str, skip_extensions: &[String]) -> bool {
    match path_extension(path) {
        Some(ext) => skip_extensions
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

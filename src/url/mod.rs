//! URL handling module
//!
//! This module provides URL normalization, the same-host key, the
//! non-content extension filter, and path-based page classification.

mod domain;
mod filter;
mod matcher;
mod normalize;

use crate::config::ClassifyConfig;
use std::fmt;

// Re-export main functions
pub use domain::host_key;
pub use filter::{has_skipped_extension, path_extension};
pub use matcher::matches_prefix;
pub use normalize::{normalize_url, NormalizedUrl};

/// Page classification by URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKind {
    /// The site root
    Index,
    /// An author profile or author listing
    Author,
    /// A category listing
    Category,
    /// A tag listing
    Tag,
    /// Anything else: articles and standalone pages
    Content,
}

impl PageKind {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Author => "author",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Content => "content",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "index" => Some(Self::Index),
            "author" => Some(Self::Author),
            "category" => Some(Self::Category),
            "tag" => Some(Self::Tag),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_db_string())
    }
}

/// Classifies a page according to the configured section prefixes
///
/// This function checks the path in the following priority order:
/// 1. Root path (`/` or empty)
/// 2. Author prefixes
/// 3. Category prefixes
/// 4. Tag prefixes
/// 5. Content (default)
///
/// # Examples
///
/// ```
/// use portal_crawler::config::ClassifyConfig;
/// use portal_crawler::url::{classify_page, PageKind};
///
/// let config = ClassifyConfig::default();
/// assert_eq!(classify_page("/", &config), PageKind::Index);
/// assert_eq!(classify_page("/author/asalpan/", &config), PageKind::Author);
/// assert_eq!(classify_page("/2024/05/some-article/", &config), PageKind::Content);
/// ```
pub fn classify_page(path: &str, config: &ClassifyConfig) -> PageKind {
    if path.is_empty() || path == "/" {
        return PageKind::Index;
    }

    let sections = [
        (&config.author_prefixes, PageKind::Author),
        (&config.category_prefixes, PageKind::Category),
        (&config.tag_prefixes, PageKind::Tag),
    ];

    for (prefixes, kind) in sections {
        if prefixes.iter().any(|prefix| matches_prefix(prefix, path)) {
            return kind;
        }
    }

    PageKind::Content
}

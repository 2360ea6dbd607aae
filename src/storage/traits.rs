//! Storage traits and error types

use crate::url::NormalizedUrl;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for raw HTML of crawled pages
///
/// Implementations must be safe to call from several in-flight fetches; each
/// call owns the file it returns.
pub trait PageStore: Send + Sync {
    /// Persists `html` for `url` and returns the file name it was written to
    fn save_page(&self, url: &NormalizedUrl, html: &str) -> StorageResult<String>;
}

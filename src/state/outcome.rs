/// What happened to a single claimed URL
///
/// Every claimed URL ends in exactly one outcome and is never retried.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page was fetched, stored and indexed under the given sequence id
    Processed { id: u64 },

    /// Response was not HTML (Content-Type mismatch)
    NotHtml { content_type: String },

    /// Response status was not 200
    HttpStatus { status_code: u16 },

    /// Transport error or timeout
    FetchFailed { error: String },

    /// Page could not be written to the page store
    StoreFailed { error: String },
}

impl PageOutcome {
    /// Returns true if the page was skipped because of what the server returned
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::NotHtml { .. } | Self::HttpStatus { .. })
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processed { id } => write!(f, "processed as #{}", id),
            Self::NotHtml { content_type } => write!(f, "skipped, content type {:?}", content_type),
            Self::HttpStatus { status_code } => write!(f, "skipped, HTTP {}", status_code),
            Self::FetchFailed { error } => write!(f, "fetch failed: {}", error),
            Self::StoreFailed { error } => write!(f, "store failed: {}", error),
        }
    }
}

/// Crawl phase definitions
///
/// A crawl moves strictly forward through three phases and never returns to
/// an earlier one.
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Collecting seed URLs from the sitemap
    Seeding,

    /// Fetching pages from the frontier
    Running,

    /// Frontier exhausted or page budget reached; the index can be exported
    Done,
}

impl CrawlPhase {
    /// Returns true if `next` is the phase directly after this one
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Seeding, Self::Running) | (Self::Running, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

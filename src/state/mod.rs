//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Seeding, running, done; only forward transitions are legal
//! - `PageOutcome`: The single terminal result of each claimed URL

mod outcome;
mod phase;

// Re-export main types
pub use outcome::PageOutcome;
pub use phase::CrawlPhase;

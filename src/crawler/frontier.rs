//! Crawl frontier and visited set
//!
//! This module handles:
//! - The FIFO queue of URLs waiting to be fetched
//! - Queue membership, so a URL is never queued twice
//! - The visited set, which a URL joins before it is fetched
//! - The page budget

use crate::url::NormalizedUrl;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Breadth-first frontier for a single crawl
///
/// A URL is in at most one of "queued" and "visited" at any moment, and
/// once visited it never leaves the visited set.
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<NormalizedUrl>,

    /// Mirror of `queue` for O(1) membership checks
    queued: HashSet<NormalizedUrl>,

    /// Every URL claimed for fetching
    visited: HashSet<NormalizedUrl>,

    /// The initial seed set, used to tag records as sitemap-sourced
    seeds: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Creates a frontier holding `seeds` in their sorted order
    pub fn new(seeds: &BTreeSet<NormalizedUrl>) -> Self {
        let mut frontier = Self {
            seeds: seeds.iter().cloned().collect(),
            ..Self::default()
        };
        for seed in seeds {
            frontier.enqueue(seed.clone());
        }
        frontier
    }

    /// Claims the next URL to fetch, marking it visited
    ///
    /// Returns `None` when the queue is empty or `max_pages` URLs have
    /// already been claimed.
    pub fn claim_next(&mut self, max_pages: usize) -> Option<NormalizedUrl> {
        while !self.budget_exhausted(max_pages) {
            let url = self.queue.pop_front()?;
            self.queued.remove(&url);

            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Appends `url` unless it is already queued or visited
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: NormalizedUrl) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    pub fn is_seed(&self, url: &NormalizedUrl) -> bool {
        self.seeds.contains(url)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    /// Snapshot of the queue, front first
    pub fn queued_urls(&self) -> Vec<NormalizedUrl> {
        self.queue.iter().cloned().collect()
    }

    pub fn budget_exhausted(&self, max_pages: usize) -> bool {
        self.visited.len() >= max_pages
    }
}

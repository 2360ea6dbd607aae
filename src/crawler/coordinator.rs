//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the sitemap and the base URL
//! - Claiming URLs so each one is fetched exactly once
//! - Coordinating fetching, page storage, metadata and link extraction
//! - Assigning gap-free record ids
//! - Enforcing the page budget and the politeness delay

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::metadata::extract_metadata;
use crate::crawler::parser::LinkExtractor;
use crate::crawler::sitemap::SitemapSeeder;
use crate::state::{CrawlPhase, PageOutcome};
use crate::storage::{derive_filename, CrawlLog, HtmlDirectory, PageRecord, PageStore, RunRecord};
use crate::url::{classify_page, normalize_url, NormalizedUrl};
use crate::CrawlerError;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, warn};
use url::Url;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Records in id order
    pub records: Vec<PageRecord>,

    /// URLs claimed for fetching, successful or not
    pub pages_visited: usize,

    /// URLs still queued when the crawl stopped
    pub queue_remaining: usize,

    /// Size of the seed set, base URL included
    pub seed_count: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Builds the `crawl_runs` row for this report
    pub fn run_record(&self, base_url: &str, config_hash: &str) -> RunRecord {
        RunRecord {
            base_url: base_url.to_string(),
            started_at: self.started_at.to_rfc3339(),
            finished_at: self.finished_at.to_rfc3339(),
            config_hash: config_hash.to_string(),
            seed_count: self.seed_count,
            pages_visited: self.pages_visited,
            queue_remaining: self.queue_remaining,
        }
    }
}

/// Mutable crawl state shared by all fetch loops
///
/// Guarded by a std mutex that is never held across an `.await`.
struct CrawlState {
    frontier: Frontier,
    records: Vec<PageRecord>,
    in_flight: usize,
}

/// Result of trying to take work from the frontier
enum Claim {
    Url(NormalizedUrl),
    /// Queue is empty but other fetches may still add links
    Wait,
    Finished,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    base: Url,
    extractor: LinkExtractor,
    store: Box<dyn PageStore>,
    log: Arc<CrawlLog>,
    state: Arc<Mutex<CrawlState>>,
    /// Signalled when an in-flight fetch finishes
    fetch_done: Notify,
    phase: CrawlPhase,
    started_at: DateTime<Utc>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, creates the pages directory and opens the
    /// error log; failure to do any of these is fatal.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to seed
    /// * `Err(CrawlerError)` - Failed to initialize
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        validate(&config)?;

        let base = Url::parse(&config.crawler.base_url)?;
        let client = build_http_client(&config.crawler)?;
        let store = HtmlDirectory::create(Path::new(&config.output.pages_dir))?;
        let log = CrawlLog::open(Path::new(&config.output.log_path))?;
        info!(
            "Pages go to {}, errors to {}",
            store.dir().display(),
            log.path().display()
        );
        let extractor = LinkExtractor::new(&base, &config.crawler.skip_extensions);

        Ok(Self {
            config: Arc::new(config),
            client,
            base,
            extractor,
            store: Box::new(store),
            log: Arc::new(log),
            state: Arc::new(Mutex::new(CrawlState {
                frontier: Frontier::default(),
                records: Vec::new(),
                in_flight: 0,
            })),
            fetch_done: Notify::new(),
            phase: CrawlPhase::Seeding,
            started_at: Utc::now(),
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Size of the seed set, base URL included; 0 before seeding
    pub fn seed_count(&self) -> usize {
        self.lock_state().frontier.seed_count()
    }

    /// Queued URLs, front first
    pub fn frontier_snapshot(&self) -> Vec<NormalizedUrl> {
        self.lock_state().frontier.queued_urls()
    }

    pub fn visited_count(&self) -> usize {
        self.lock_state().frontier.visited_len()
    }

    /// Records produced so far, in id order
    pub fn records(&self) -> Vec<PageRecord> {
        self.lock_state().records.clone()
    }

    /// Collects sitemap seeds plus the base URL and moves to `Running`
    pub async fn seed(&mut self) -> Result<(), CrawlerError> {
        self.check_transition(CrawlPhase::Running)?;
        info!("Collecting seed URLs from sitemap");

        let seeder = SitemapSeeder::new(
            self.client.clone(),
            self.config.crawler.sitemap_path.clone(),
            Duration::from_secs(self.config.crawler.sitemap_timeout_secs),
            Duration::from_millis(self.config.crawler.sitemap_delay_ms),
            Arc::clone(&self.log),
        );
        let mut seeds = seeder.collect_seeds(&self.base).await;
        seeds.insert(normalize_url(self.base.as_str()));

        self.lock_state().frontier = Frontier::new(&seeds);
        info!("Total seed URLs: {}", seeds.len());

        self.phase = CrawlPhase::Running;
        Ok(())
    }

    /// Runs one crawl iteration
    ///
    /// # Returns
    ///
    /// * `Ok(Some(outcome))` - A URL was claimed and processed
    /// * `Ok(None)` - Frontier empty or page budget exhausted
    /// * `Err(CrawlerError::InvalidPhase)` - Crawl is not running
    pub async fn step(&self) -> Result<Option<PageOutcome>, CrawlerError> {
        self.require_phase(CrawlPhase::Running)?;

        match self.claim() {
            Claim::Url(url) => Ok(Some(self.process_claimed(&url).await)),
            Claim::Wait | Claim::Finished => Ok(None),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Seeds first if that has not happened yet, then drives
    /// `max-concurrent-fetches` fetch loops until the frontier drains or the
    /// budget is spent.
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlerError> {
        if self.phase == CrawlPhase::Seeding {
            self.seed().await?;
        }
        self.require_phase(CrawlPhase::Running)?;

        let workers = self.config.crawler.max_concurrent_fetches.max(1);
        info!(
            "BFS crawl starting (max pages: {}, concurrent fetches: {})",
            self.config.crawler.max_pages, workers
        );

        {
            let this = &*self;
            stream::iter(0..workers)
                .map(|worker| this.fetch_loop(worker))
                .buffer_unordered(workers as usize)
                .collect::<Vec<()>>()
                .await;
        }

        self.check_transition(CrawlPhase::Done)?;
        self.phase = CrawlPhase::Done;

        let report = self.report();
        info!(
            "Crawl complete: {} pages crawled, {} visited, {} left in queue",
            report.records.len(),
            report.pages_visited,
            report.queue_remaining
        );
        Ok(report)
    }

    async fn fetch_loop(&self, worker: u32) {
        debug!("Fetch loop {} started", worker);
        loop {
            // Registered before claiming so a completion between the claim
            // and the await still wakes this loop
            let fetch_done = self.fetch_done.notified();
            tokio::pin!(fetch_done);
            fetch_done.as_mut().enable();

            match self.claim() {
                Claim::Url(url) => {
                    self.process_claimed(&url).await;
                }
                Claim::Wait => fetch_done.await,
                Claim::Finished => break,
            }
        }
        debug!("Fetch loop {} finished", worker);
    }

    /// Takes the next URL, marking it visited before any network call
    fn claim(&self) -> Claim {
        let mut state = self.lock_state();
        let max_pages = self.config.crawler.max_pages;

        if state.frontier.budget_exhausted(max_pages) {
            return Claim::Finished;
        }

        match state.frontier.claim_next(max_pages) {
            Some(url) => {
                state.in_flight += 1;
                Claim::Url(url)
            }
            None if state.in_flight > 0 => Claim::Wait,
            None => Claim::Finished,
        }
    }

    async fn process_claimed(&self, url: &NormalizedUrl) -> PageOutcome {
        let outcome = self.process_url(url).await;
        self.lock_state().in_flight -= 1;
        self.fetch_done.notify_waiters();

        if outcome.is_skipped() {
            debug!("{}: {}", url, outcome);
        }

        let delay = self.config.crawler.request_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        outcome
    }

    /// Fetches and processes a single claimed URL
    ///
    /// Never fails: every problem becomes a non-success outcome, and
    /// transport errors are written to the error log.
    async fn process_url(&self, url: &NormalizedUrl) -> PageOutcome {
        let timeout = Duration::from_secs(self.config.crawler.page_timeout_secs);

        match fetch_page(&self.client, url.as_str(), timeout).await {
            FetchResult::Success { final_url, body } => {
                if final_url != url.as_str() {
                    debug!("{} redirected to {}", url, final_url);
                }
                self.process_page(url, &body)
            }
            FetchResult::ContentMismatch { content_type } => {
                PageOutcome::NotHtml { content_type }
            }
            FetchResult::HttpError { status_code } => PageOutcome::HttpStatus { status_code },
            FetchResult::NetworkError { error, timed_out } => {
                let message = if timed_out {
                    format!("Timeout fetching {}", url)
                } else {
                    format!("Fetch error {}: {}", url, error)
                };
                warn!("{}", message);
                self.log.record(&message);
                PageOutcome::FetchFailed { error }
            }
        }
    }

    /// Stores an HTML page, extracts its metadata and links, and records it
    fn process_page(&self, url: &NormalizedUrl, html: &str) -> PageOutcome {
        let file = match self.store.save_page(url, html) {
            Ok(file) => file,
            Err(e) => {
                let message = format!("Write error {}: {}", url, e);
                warn!("{}", message);
                self.log.record(&message);
                return PageOutcome::StoreFailed {
                    error: e.to_string(),
                };
            }
        };

        let derived = derive_filename(url.path());
        if file != derived {
            self.log
                .record(&format!("File name collision {}: {} stored as {}", url, derived, file));
        }

        let metadata = extract_metadata(html);
        let page_url = Url::parse(url.as_str()).unwrap_or_else(|_| self.base.clone());
        let links = self.extractor.extract_links(html, &page_url);

        let record = {
            let mut state = self.lock_state();
            let new_links_added = links
                .follow
                .into_iter()
                .filter(|link| state.frontier.enqueue(link.clone()))
                .count();

            let record = PageRecord {
                id: state.records.len() as u64 + 1,
                url: url.to_string(),
                file,
                title: metadata.title,
                category: metadata.category,
                author: metadata.author,
                description: metadata.description,
                path: url.path().to_string(),
                kind: classify_page(url.path(), &self.config.classify),
                from_sitemap: state.frontier.is_seed(url),
                links_found: links.discovered,
                new_links_added,
            };
            state.records.push(record.clone());
            record
        };

        info!(
            "[{}] {} (links: {}, new: {})",
            record.id, record.file, record.links_found, record.new_links_added
        );
        PageOutcome::Processed { id: record.id }
    }

    fn report(&self) -> CrawlReport {
        let state = self.lock_state();
        CrawlReport {
            records: state.records.clone(),
            pages_visited: state.frontier.visited_len(),
            queue_remaining: state.frontier.queue_len(),
            seed_count: state.frontier.seed_count(),
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }

    fn check_transition(&self, next: CrawlPhase) -> Result<(), CrawlerError> {
        if self.phase.can_transition_to(next) {
            Ok(())
        } else {
            Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            })
        }
    }

    fn require_phase(&self, expected: CrawlPhase) -> Result<(), CrawlerError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CrawlerError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

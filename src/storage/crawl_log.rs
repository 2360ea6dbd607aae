//! Append-only error log
//!
//! Fetch failures, sitemap problems and page write errors are recorded here
//! as one timestamped line each. The log outlives the process and is kept
//! separate from the `tracing` output.

use crate::storage::traits::StorageResult;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Timestamp layout of each log line
const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Durable crawl error log
pub struct CrawlLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl CrawlLog {
    /// Opens (or creates) the log file for appending
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the log file
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlLog)` - Log is open for appending
    /// * `Err(StorageError)` - File could not be opened
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line: `YYYY-MM-DD HH:MM:SS - <message>`
    ///
    /// A failed write is reported through `tracing` and otherwise ignored.
    pub fn record(&self, message: &str) {
        let line = format!("{} - {}\n", Local::now().format(LINE_TIME_FORMAT), message);
        let mut file = self.file.lock().unwrap_or_else(|p| p.into_inner());

        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("Failed to write to {}: {}", self.path.display(), e);
        }
    }
}

//! On-disk page store
//!
//! Each crawled page is written as a single `.html` file whose name is
//! derived from the URL path.

use crate::storage::traits::{PageStore, StorageResult};
use crate::url::NormalizedUrl;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{trace, warn};

/// Derives the file name a page is stored under
///
/// Leading and trailing slashes are trimmed, the root becomes `index.html`,
/// and the remaining slashes are flattened to underscores.
///
/// # Examples
///
/// ```
/// use portal_crawler::storage::derive_filename;
///
/// assert_eq!(derive_filename("/"), "index.html");
/// assert_eq!(derive_filename("/a/b/"), "a_b.html");
/// ```
pub fn derive_filename(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}.html", trimmed.replace('/', "_"))
    }
}

/// Directory of raw HTML files, one per crawled page
pub struct HtmlDirectory {
    dir: PathBuf,

    /// File name -> URL that owns it, used to detect colliding names
    owners: Mutex<HashMap<String, NormalizedUrl>>,
}

impl HtmlDirectory {
    /// Creates the directory (and parents) if needed
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory the page files are written into
    ///
    /// # Returns
    ///
    /// * `Ok(HtmlDirectory)` - Directory exists and is ready for writes
    /// * `Err(StorageError)` - Directory could not be created
    pub fn create(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            owners: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserves a file name for `url`, renaming on collision
    ///
    /// Returns the chosen name and whether it differs from the derived one.
    fn reserve_name(&self, url: &NormalizedUrl) -> (String, bool) {
        let derived = derive_filename(url.path());
        let mut owners = self.owners.lock().unwrap_or_else(|p| p.into_inner());

        match owners.get(&derived) {
            None => {
                owners.insert(derived.clone(), url.clone());
                return (derived, false);
            }
            Some(owner) if owner == url => return (derived, false),
            Some(_) => {}
        }

        let stem = derived.trim_end_matches(".html");
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}.html", stem, n);
            match owners.get(&candidate) {
                None => {
                    owners.insert(candidate.clone(), url.clone());
                    return (candidate, true);
                }
                Some(owner) if owner == url => return (candidate, false),
                Some(_) => n += 1,
            }
        }
    }
}

impl PageStore for HtmlDirectory {
    fn save_page(&self, url: &NormalizedUrl, html: &str) -> StorageResult<String> {
        let (name, renamed) = self.reserve_name(url);
        if renamed {
            warn!(
                "File name {} already used by another URL, storing {} as {}",
                derive_filename(url.path()),
                url,
                name
            );
        }

        fs::write(self.dir.join(&name), html)?;
        trace!("Wrote {} ({} bytes)", name, html.len());
        Ok(name)
    }
}

//! Crawl settings and default file locations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Cap on discovered sub-pages.
    pub max_sub_pages: usize,
    /// Main-page budget; each sub-page gets half.
    pub timeout_ms: u64,
    /// Sub-pages fetched concurrently per batch.
    pub batch_size: usize,
    /// Pause after load before the markup is read.
    pub settle_delay_ms: u64,
    pub wait_selector: Option<String>,
    pub selector_timeout_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_sub_pages: 10,
            timeout_ms: 30_000,
            batch_size: 3,
            settle_delay_ms: 2_000,
            wait_selector: None,
            selector_timeout_ms: 5_000,
            user_agent: None,
        }
    }
}

impl CrawlConfig {
    pub fn sub_page_timeout_ms(&self) -> u64 {
        self.timeout_ms / 2
    }

    /// Batch size, never zero.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

/// Data directory: `$SITEGRADE_HOME`, else `~/.sitegrade`.
pub fn sitegrade_home() -> PathBuf {
    if let Ok(p) = std::env::var("SITEGRADE_HOME") {
        return PathBuf::from(p);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".sitegrade")
}

pub fn default_rules_path() -> PathBuf {
    sitegrade_home().join("rules.json")
}

pub fn default_corpus_path() -> PathBuf {
    sitegrade_home().join("corpus.json")
}

pub fn default_calibration_path() -> PathBuf {
    sitegrade_home().join("calibration.json")
}

/// `explicit` if given, else `fallback` when that file exists.
pub fn resolve_optional(explicit: Option<PathBuf>, fallback: PathBuf) -> Option<PathBuf> {
    explicit.or_else(|| fallback.exists().then_some(fallback))
}

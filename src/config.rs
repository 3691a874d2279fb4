// src/config.rs
// =============================================================================
// The validated run configuration the crawl and download phases consume.
//
// It is built once from the command line (see cli.rs) and never changes
// afterwards.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::crawl::SiteScope;

/// Link hops followed when `-r` is given without `-l`
pub const DEFAULT_MAX_DEPTH: usize = 5;
/// Where images land when `-p` is not given
pub const DEFAULT_SAVE_DIR: &str = "./data/";
/// Upper bound on in-flight page fetches
pub const DEFAULT_CONCURRENCY: usize = 16;
/// Per-fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The seed URL exactly as given
    pub seed: String,
    /// Hostname boundary derived from the seed
    pub scope: SiteScope,
    /// Follow in-scope links
    pub recursive: bool,
    /// Link hops allowed from the seed
    pub max_depth: usize,
    pub save_dir: PathBuf,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl CrawlConfig {
    /// Config with defaults for everything but the seed.
    pub fn new(seed: impl Into<String>, scope: SiteScope) -> Self {
        Self {
            seed: seed.into(),
            scope,
            recursive: false,
            max_depth: DEFAULT_MAX_DEPTH,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// The budget the seed visit starts with.
    ///
    /// A page at hop distance `d` is visited with `max_depth + 1 - d`, so the
    /// deepest pages fetched sit exactly `max_depth` hops away. Without
    /// recursion only the seed is fetched.
    pub fn page_budget(&self) -> usize {
        if self.recursive {
            self.max_depth.saturating_add(1)
        } else {
            1
        }
    }
}

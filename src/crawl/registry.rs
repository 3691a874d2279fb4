// src/crawl/registry.rs
// =============================================================================
// The two pieces of shared mutable state in a crawl.
//
// - VisitedRegistry: which pages have been claimed for fetching
// - ImageRegistry: every image URL seen on any visited page
//
// Both sit behind a std Mutex. The lock is never held across an .await, so
// a plain blocking mutex is enough even on a multi-threaded runtime.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::scope::CanonicalUrl;

// A panic elsewhere while holding the lock does not make the set invalid
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single dedup authority for page fetches.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL for fetching.
    ///
    /// Returns `true` exactly once per visit key per run. The membership test
    /// and the insert are one `HashSet::insert` under the lock, so two
    /// concurrent callers can never both win.
    pub fn try_claim(&self, url: &CanonicalUrl) -> bool {
        lock(&self.claimed).insert(url.visit_key())
    }

    pub fn len(&self) -> usize {
        lock(&self.claimed).len()
    }
}

/// Every image discovered during the crawl, stored once.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: Mutex<HashSet<CanonicalUrl>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the image was not known yet.
    ///
    /// The fragment is dropped first, so `a.png` and `a.png#zoom` are one
    /// image.
    pub fn register(&self, url: &CanonicalUrl) -> bool {
        lock(&self.images).insert(url.without_fragment())
    }

    pub fn len(&self) -> usize {
        lock(&self.images).len()
    }

    /// Sorted copy of the registry, for the download pass.
    pub fn snapshot(&self) -> Vec<CanonicalUrl> {
        let mut images: Vec<_> = lock(&self.images).iter().cloned().collect();
        images.sort();
        images
    }
}

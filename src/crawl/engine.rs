// src/crawl/engine.rs
// =============================================================================
// The crawl engine: depth-bounded recursive fan-out over one site.
//
// How one visit works:
// 1. Claim the normalized URL in the visited registry (skip if taken)
// 2. Fetch the page body (a failure ends this branch only)
// 3. Register every image src on the page
// 4. If recursion is on, crawl every in-scope link with budget - 1,
//    all at once, and wait for the whole subtree before returning
//
// Concurrency:
// - All visits run as futures inside the caller's task; a page's children
//   are joined with join_all, so no visit outlives its parent
// - A semaphore caps how many page fetches are in flight at once. The permit
//   covers the fetch only, never the wait for children, otherwise a deep
//   tree could hold every permit while waiting on itself
// =============================================================================

use futures::future::{join_all, BoxFuture, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::registry::{ImageRegistry, VisitedRegistry};
use super::scope::{normalize, CanonicalUrl, SiteScope};
use crate::config::CrawlConfig;
use crate::extract::Extractor;
use crate::fetch::{FetchError, Fetcher};

/// Everything one crawl run mutates, plus the scope it runs in.
#[derive(Debug)]
pub struct CrawlState {
    pub scope: SiteScope,
    pub visited: VisitedRegistry,
    pub images: ImageRegistry,
    pages_visited: AtomicUsize,
    pages_failed: AtomicUsize,
}

impl CrawlState {
    pub fn new(scope: SiteScope) -> Self {
        Self {
            scope,
            visited: VisitedRegistry::new(),
            images: ImageRegistry::new(),
            pages_visited: AtomicUsize::new(0),
            pages_failed: AtomicUsize::new(0),
        }
    }
}

/// What a finished crawl hands to the download phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub images: Vec<CanonicalUrl>,
}

pub struct Crawler<F, E> {
    fetcher: Arc<F>,
    extractor: E,
    state: CrawlState,
    permits: Semaphore,
    seed: String,
    recursive: bool,
    budget: usize,
}

impl<F: Fetcher, E: Extractor> Crawler<F, E> {
    pub fn new(config: &CrawlConfig, fetcher: Arc<F>, extractor: E) -> Self {
        Self {
            fetcher,
            extractor,
            state: CrawlState::new(config.scope.clone()),
            permits: Semaphore::new(config.concurrency.max(1)),
            seed: config.seed.clone(),
            recursive: config.recursive,
            budget: config.page_budget(),
        }
    }

    /// Crawls from the seed and returns once every branch has finished.
    pub async fn run(&self) -> CrawlSummary {
        info!(
            seed = %self.seed,
            host = %self.state.scope.hostname(),
            recursive = self.recursive,
            budget = self.budget,
            "starting crawl"
        );

        self.crawl(self.seed.clone(), self.budget).await;

        let summary = CrawlSummary {
            pages_visited: self.state.pages_visited.load(Ordering::Relaxed),
            pages_failed: self.state.pages_failed.load(Ordering::Relaxed),
            images: self.state.images.snapshot(),
        };

        info!(
            claimed = self.state.visited.len(),
            pages = summary.pages_visited,
            failed = summary.pages_failed,
            images = self.state.images.len(),
            "crawl finished"
        );

        summary
    }

    /// Visits one raw href with the given remaining budget.
    ///
    /// Boxed because it recurses through `visit`.
    pub fn crawl(&self, raw: String, budget: usize) -> BoxFuture<'_, ()> {
        async move {
            if budget == 0 {
                return;
            }

            let url = normalize(&raw, &self.state.scope);
            if !self.state.visited.try_claim(&url) {
                debug!(url = %url, "already visited");
                return;
            }

            self.visit(url, budget).await;
        }
        .boxed()
    }

    async fn visit(&self, url: CanonicalUrl, budget: usize) {
        let page = match self.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                self.state.pages_failed.fetch_add(1, Ordering::Relaxed);
                warn!(url = %url, error = %e, "failed to fetch page");
                return;
            }
        };

        self.state.pages_visited.fetch_add(1, Ordering::Relaxed);
        info!(url = %url, budget, "visited page");

        // Images are harvested on every fetched page, even the last level
        for src in self.extractor.extract_images(&page) {
            let image = normalize(&src, &self.state.scope);
            if self.state.images.register(&image) {
                debug!(image = %image, page = %url, "found image");
            }
        }

        if !self.recursive {
            return;
        }

        let children: Vec<_> = self
            .extractor
            .extract_links(&page)
            .into_iter()
            .filter(|href| self.state.scope.in_scope(href))
            .map(|href| self.crawl(href, budget - 1))
            .collect();

        join_all(children).await;
    }

    async fn fetch_page(&self, url: &CanonicalUrl) -> Result<String, FetchError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Transport("crawl shut down".to_string()))?;

        self.fetcher
            .fetch(url.as_str())
            .await?
            .error_for_status()?
            .text()
    }
}

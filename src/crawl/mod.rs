// src/crawl/mod.rs
// =============================================================================
// This module handles crawling one website for images.
//
// Features:
// - URL normalization against the seed's hostname
// - A visited registry that lets each page be claimed exactly once
// - Depth-bounded recursive fan-out with concurrent page fetches
// - Same-host restriction for followed links (images may come from anywhere)
//
// Submodules:
// - scope: SiteScope, CanonicalUrl and normalize()
// - registry: the visited and image registries
// - engine: the Crawler that ties them together
// =============================================================================

mod engine;
mod registry;
mod scope;

pub use engine::{CrawlSummary, Crawler};
pub use scope::{normalize, CanonicalUrl, SiteScope};

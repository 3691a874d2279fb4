// src/extract/mod.rs
// =============================================================================
// Link and image extraction.
//
// The crawler only sees the `Extractor` trait: give it page text, get back
// raw href and src strings. How the markup is scanned is an implementation
// detail of the submodule, so a stricter tokenizer can replace it without
// touching the crawl engine.
//
// Submodules:
// - html: scraper-based extraction (CSS selectors over a parsed DOM)
// =============================================================================

mod html;

pub use html::HtmlExtractor;

/// Pulls candidate links and image sources out of page content.
///
/// Extraction never fails: malformed markup just yields fewer matches.
/// Results are raw attribute values in document order, not yet normalized.
pub trait Extractor: Send + Sync {
    fn extract_links(&self, page: &str) -> Vec<String>;
    fn extract_images(&self, page: &str) -> Vec<String>;
}

// src/extract/html.rs
// =============================================================================
// Extracts anchor hrefs and image srcs from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, tolerating broken markup like a browser does
// - Supports CSS selectors for finding elements
// - Decodes entities in attribute values (&amp; -> &)
//
// No URL resolution happens here. The crawl engine normalizes every value
// against the site scope, so this module hands back the raw attribute text.
// =============================================================================

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::Extractor;

// The selectors are constants known to be valid, so parsing them can only
// fail on a programmer error.
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("valid selector"));

// href prefixes that never point at a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "javascript:", "data:"];

/// DOM-based extractor used by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlExtractor {
    fn extract_links(&self, page: &str) -> Vec<String> {
        select_attr(page, &LINK_SELECTOR, "href")
            .into_iter()
            .filter(|href| is_followable(href))
            .collect()
    }

    fn extract_images(&self, page: &str) -> Vec<String> {
        select_attr(page, &IMAGE_SELECTOR, "src")
    }
}

// Collects one attribute from every element matching the selector,
// trimmed, skipping empty values
fn select_attr(page: &str, selector: &Selector, attr: &str) -> Vec<String> {
    let document = Html::parse_document(page);

    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

// Anchors, mail links and script handlers are not pages
fn is_followable(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    !SKIPPED_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

// src/fetch/mod.rs
// =============================================================================
// The fetch boundary: everything the crawler and downloader know about the
// network goes through the `Fetcher` trait defined here.
//
// Submodules:
// - http: the reqwest-backed implementation used by the binary
//
// The crawler never talks to reqwest directly. Tests plug in a fake fetcher
// that serves canned pages and counts how often each URL was requested.
// =============================================================================

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpFetcher;

/// Errors raised while retrieving a page or an image.
///
/// Every variant is local to the item being fetched: the crawler abandons
/// the branch, the downloader skips the image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or protocol failure
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,
    /// The body could not be decoded as text
    #[error("body is not valid UTF-8")]
    Decode,
}

/// What a fetch returns: the status line and the raw body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status codes mean success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into `FetchError::Status`.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status(self.status))
        }
    }

    /// Decodes the body as UTF-8 page text.
    pub fn text(self) -> Result<String, FetchError> {
        String::from_utf8(self.body).map_err(|_| FetchError::Decode)
    }
}

/// The `fetch(url) -> {status, body}` primitive.
///
/// Implementations must be shareable across the concurrent visits of one
/// crawl, hence `Send + Sync`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

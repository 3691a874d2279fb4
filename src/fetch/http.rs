// src/fetch/http.rs
// =============================================================================
// The real fetcher: plain GET requests over reqwest.
//
// Key functionality:
// - One shared Client for the whole run (connection pooling)
// - A per-request timeout so a stalled server only stalls one branch
// - reqwest errors are folded into our FetchError variants
//
// Status codes are NOT treated as errors here. The caller decides what a
// 404 means (see FetchResponse::error_for_status).
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{FetchError, FetchResponse, Fetcher};

const USER_AGENT: &str = concat!("spider/", env!("CARGO_PKG_VERSION"));

/// Fetches over HTTP(S) with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the client with a per-request timeout.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;
        let status = response.status().as_u16();

        // Reading the body can also time out or drop the connection
        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(FetchResponse::new(status, body.to_vec()))
    }
}

// Folds the many ways a reqwest call can fail into our taxonomy
//
// - timeouts get their own variant so logs read clearly
// - a decode failure is reported as Decode
// - everything else (DNS, refused connection, TLS, redirect loops) is transport
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_decode() {
        FetchError::Decode
    } else if error.is_redirect() {
        FetchError::Transport("too many redirects".to_string())
    } else if error.is_connect() {
        FetchError::Transport(format!("connection failed: {}", error))
    } else {
        FetchError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("spider/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 9 on localhost is reserved (discard) and normally closed
        let result = fetcher.fetch("http://127.0.0.1:9/").await;
        assert!(matches!(
            result,
            Err(FetchError::Transport(_)) | Err(FetchError::Timeout)
        ));
    }
}

// src/download/mod.rs
// =============================================================================
// The image download pass.
//
// Runs after the crawl has completely finished, over a snapshot of the image
// registry. Images are processed one after another:
// - URLs without a known image extension are skipped silently
// - a failed or non-2xx fetch is logged and skipped
// - everything else is written to the save directory without overwriting
//
// Nothing in here aborts the pass. The return value lists what was saved.
// =============================================================================

mod persist;

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::crawl::CanonicalUrl;
use crate::fetch::{FetchError, Fetcher};

pub use persist::{filename_from_url, write_unique};

/// File extensions we download, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// One image saved to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    pub source_url: String,
    pub local_path: PathBuf,
}

/// Why a single image was not saved.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no filename in URL path")]
    NoFilename,
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Downloader<F> {
    fetcher: Arc<F>,
    save_dir: PathBuf,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(fetcher: Arc<F>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            save_dir: save_dir.into(),
        }
    }

    /// Downloads every image in order and returns the ones that were saved.
    pub async fn download_all(&self, images: &[CanonicalUrl]) -> Vec<DownloadResult> {
        if let Err(e) = tokio::fs::create_dir_all(&self.save_dir).await {
            error!(dir = %self.save_dir.display(), error = %e, "cannot create save directory");
            return Vec::new();
        }

        let mut saved = Vec::new();
        for image in images {
            if !has_image_extension(image.as_str()) {
                debug!(url = %image, "not an image file, skipping");
                continue;
            }

            match self.download(image.as_str()).await {
                Ok(result) => {
                    info!(url = %image, path = %result.local_path.display(), "saved image");
                    saved.push(result);
                }
                Err(e) => warn!(url = %image, error = %e, "failed to download image"),
            }
        }

        saved
    }

    /// Fetches one image and writes it under a collision-free name.
    pub async fn download(&self, url: &str) -> Result<DownloadResult, DownloadError> {
        let filename = filename_from_url(url).ok_or(DownloadError::NoFilename)?;

        let response = self.fetcher.fetch(url).await?.error_for_status()?;
        let local_path = write_unique(&self.save_dir, &filename, &response.body).await?;

        Ok(DownloadResult {
            source_url: url.to_string(),
            local_path,
        })
    }
}

/// Whether the URL's path ends in one of [`IMAGE_EXTENSIONS`].
///
/// Query strings and fragments are ignored when the URL parses; otherwise
/// the raw text is matched.
pub fn has_image_extension(url: &str) -> bool {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url.to_ascii_lowercase(),
    };
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::{normalize, SiteScope};
    use crate::fetch::mock::MockFetcher;

    fn urls(raw: &[&str]) -> Vec<CanonicalUrl> {
        let scope = SiteScope::from_seed("https://example.com").unwrap();
        raw.iter().map(|r| normalize(r, &scope)).collect()
    }

    #[test]
    fn test_image_extensions() {
        assert!(has_image_extension("https://example.com/a.PNG"));
        assert!(has_image_extension("https://example.com/a.jpeg?w=200"));
        assert!(has_image_extension("https://example.com/a.bmp"));
        assert!(!has_image_extension("https://example.com/a.svg"));
        assert!(!has_image_extension("https://example.com/png"));
        assert!(!has_image_extension("https://example.com/"));
    }

    #[tokio::test]
    async fn test_missing_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(
            MockFetcher::new()
                .response("https://example.com/one.png", 200, b"one")
                .response("https://example.com/three.gif", 200, b"three"),
        );
        let downloader = Downloader::new(Arc::clone(&fetcher), dir.path());

        // two.jpg is unknown to the mock and answers 404
        let saved = downloader
            .download_all(&urls(&["/one.png", "/two.jpg", "/three.gif"]))
            .await;

        let names: Vec<_> = saved
            .iter()
            .map(|r| r.local_path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["one.png", "three.gif"]);
        assert_eq!(fetcher.calls("https://example.com/two.jpg"), 1);
        assert!(!dir.path().join("two.jpg").exists());
    }

    #[tokio::test]
    async fn test_non_images_are_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let downloader = Downloader::new(Arc::clone(&fetcher), dir.path());

        let saved = downloader
            .download_all(&urls(&["/icon.svg", "/page.html"]))
            .await;

        assert!(saved.is_empty());
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_same_name_from_different_hosts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"original").unwrap();

        let fetcher = Arc::new(
            MockFetcher::new()
                .response("https://a.example.com/photo.jpg", 200, b"a")
                .response("https://b.example.com/x/photo.jpg", 200, b"b"),
        );
        let downloader = Downloader::new(fetcher, dir.path());

        let saved = downloader
            .download_all(&urls(&[
                "https://a.example.com/photo.jpg",
                "https://b.example.com/x/photo.jpg",
            ]))
            .await;

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].local_path, dir.path().join("photo(1).jpg"));
        assert_eq!(saved[1].local_path, dir.path().join("photo(2).jpg"));
        assert_eq!(std::fs::read(dir.path().join("photo.jpg")).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_save_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("images");
        let fetcher = Arc::new(MockFetcher::new().response("https://example.com/a.png", 200, b"a"));

        let saved = Downloader::new(fetcher, &nested)
            .download_all(&urls(&["/a.png"]))
            .await;

        assert_eq!(saved.len(), 1);
        assert!(nested.join("a.png").exists());
    }
}

// src/download/persist.rs
// =============================================================================
// Collision-free persistence of downloaded images.
//
// If "photo.jpg" already exists in the save directory, the bytes go to
// "photo(1).jpg", then "photo(2).jpg", and so on. Existing files are never
// touched.
//
// Each candidate is opened with create_new, so checking for a free name and
// claiming it are the same filesystem call.
// =============================================================================

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Extracts the last path segment from a URL for use as a filename.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// The `n`th candidate name: `name.ext` for 0, `name(n).ext` after that.
fn candidate_name(filename: &str, n: usize) -> String {
    if n == 0 {
        return filename.to_string();
    }

    // Split at the last dot, but a leading dot (".hidden") is not an extension
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}({}){}", &filename[..dot], n, &filename[dot..]),
        _ => format!("{}({})", filename, n),
    }
}

/// Writes `bytes` under `dir` using the first unused variant of `filename`.
///
/// Returns the path actually written.
pub async fn write_unique(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let mut n = 0;
    loop {
        let path = dir.join(candidate_name(filename, n));

        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => {
                fill_or_remove(file, &path, bytes).await?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

// Writes the bytes into a freshly claimed file. A failed write removes the
// file again so the name is free for the next run.
async fn fill_or_remove<W>(mut file: W, path: &Path, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        drop(file);
        let _ = tokio::fs::remove_file(path).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    // A writer whose every write fails, like a full disk
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "no space left")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/a/b/photo.jpg").as_deref(),
            Some("photo.jpg")
        );
        assert_eq!(
            filename_from_url("https://example.com/pic.png?size=large").as_deref(),
            Some("pic.png")
        );
        assert_eq!(
            filename_from_url("https://example.com/dir/").as_deref(),
            Some("dir")
        );
        assert_eq!(filename_from_url("https://example.com/"), None);
        assert_eq!(filename_from_url("not a url"), None);
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name("img.png", 0), "img.png");
        assert_eq!(candidate_name("img.png", 1), "img(1).png");
        assert_eq!(candidate_name("archive.tar.gz", 2), "archive.tar(2).gz");
        assert_eq!(candidate_name("noext", 3), "noext(3)");
        assert_eq!(candidate_name(".hidden", 1), ".hidden(1)");
    }

    #[tokio::test]
    async fn test_existing_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"original").unwrap();

        let written = write_unique(dir.path(), "photo.jpg", b"new").await.unwrap();

        assert_eq!(written, dir.path().join("photo(1).jpg"));
        assert_eq!(std::fs::read(dir.path().join("photo.jpg")).unwrap(), b"original");
        assert_eq!(std::fs::read(&written).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_repeated_writes_get_increasing_suffixes() {
        let dir = tempfile::tempdir().unwrap();

        let mut paths = Vec::new();
        for i in 0..3u8 {
            paths.push(write_unique(dir.path(), "img.png", &[i]).await.unwrap());
        }

        assert_eq!(
            paths,
            vec![
                dir.path().join("img.png"),
                dir.path().join("img(1).png"),
                dir.path().join("img(2).png"),
            ]
        );
        assert_eq!(std::fs::read(&paths[2]).unwrap(), vec![2u8]);
    }

    #[tokio::test]
    async fn test_failed_write_frees_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.png");
        std::fs::write(&path, b"").unwrap();

        let result = fill_or_remove(FullDisk, &path, b"image bytes").await;

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_successful_fill_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        let file = tokio::fs::File::create(&path).await.unwrap();

        fill_or_remove(file, &path, b"png").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_unique(&missing, "a.png", b"x").await.is_err());
    }
}

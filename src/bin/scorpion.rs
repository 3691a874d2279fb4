// src/bin/scorpion.rs
// =============================================================================
// Companion tool to spider: prints the metadata stored in image files.
//
//   scorpion FILE [FILE...]
//
// Each file is handled on its own. Unreadable or malformed files are logged
// and skipped, files with an unknown extension are ignored, and the process
// exits 0 once the arguments parse.
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use spider::logging;
use spider::metadata::{read_metadata, Entry, ImageKind};

#[derive(Parser, Debug)]
#[command(
    name = "scorpion",
    version,
    about = "Print the metadata of PNG, JPEG, GIF and BMP files"
)]
struct Cli {
    /// Image files to inspect
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logging::init_logging();

    for path in &cli.files {
        match inspect(path) {
            Ok(Some((kind, entries))) => print_entries(path, kind, &entries),
            Ok(None) => debug!(file = %path.display(), "not an image we can read, skipping"),
            Err(e) => warn!(file = %path.display(), error = %format!("{:#}", e), "cannot read metadata"),
        }
    }
}

// Reads one file; None when the extension is not a known image format
fn inspect(path: &Path) -> Result<Option<(ImageKind, Vec<Entry>)>> {
    let Some(kind) = ImageKind::from_path(path) else {
        return Ok(None);
    };

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let entries = read_metadata(kind, &bytes)?;

    Ok(Some((kind, entries)))
}

fn print_entries(path: &Path, kind: ImageKind, entries: &[Entry]) {
    println!("{} ({})", path.display(), kind);
    if entries.is_empty() {
        println!("   no metadata");
    }
    for entry in entries {
        println!("   {}: {}", entry.key, entry.value);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_a_file() {
        assert!(Cli::try_parse_from(["scorpion"]).is_err());
        let cli = Cli::try_parse_from(["scorpion", "a.png", "b.jpg"]).unwrap();
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_inspect_gif_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, b"GIF89a\x10\x00\x20\x00\x00\x00\x00").unwrap();

        let (kind, entries) = inspect(&path).unwrap().unwrap();
        assert_eq!(kind, ImageKind::Gif);
        assert!(entries.contains(&Entry::new("Width", "16")));
        assert!(entries.contains(&Entry::new("Height", "32")));
    }

    #[test]
    fn test_inspect_skips_unknown_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(inspect(&dir.path().join("notes.txt")).unwrap().is_none());
        assert!(inspect(&dir.path().join("missing.png")).is_err());
    }
}

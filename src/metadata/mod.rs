// src/metadata/mod.rs
// =============================================================================
// Reads the metadata stored inside image files, the ones spider downloads.
//
// What we look at, per format:
// - PNG: tEXt, zTXt and iTXt text chunks, and the eXIf chunk
// - JPEG: the EXIF block in the APP1 segment
// - GIF: version, logical screen size, global color table flag
// - BMP: file size, dimensions, bits per pixel
//
// Submodules:
// - png: chunk walking and text chunk decoding
// - tags: EXIF decoding (kamadak-exif)
// - header: fixed-offset GIF and BMP header fields
// =============================================================================

mod header;
mod png;
mod tags;

use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

/// One piece of metadata, e.g. `Width: 640`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not a valid {0} file")]
    Signature(&'static str),
    #[error("file ends in the middle of a header or chunk")]
    Truncated,
    #[error("malformed {0} chunk")]
    MalformedChunk(&'static str),
    #[error("unsupported compression method {0}")]
    Compression(u8),
    #[error("cannot inflate compressed text: {0}")]
    Inflate(#[from] io::Error),
    #[error("cannot parse EXIF data: {0}")]
    Exif(#[from] exif::Error),
}

/// The formats we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageKind {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

/// Reads every metadata entry from the file contents.
pub fn read_metadata(kind: ImageKind, bytes: &[u8]) -> Result<Vec<Entry>, MetadataError> {
    match kind {
        ImageKind::Png => png::read(bytes),
        ImageKind::Jpeg => tags::from_jpeg(bytes),
        ImageKind::Gif => header::read_gif(bytes),
        ImageKind::Bmp => header::read_bmp(bytes),
    }
}

// src/metadata/tags.rs
// =============================================================================
// EXIF decoding on top of kamadak-exif.
//
// JPEG files carry EXIF inside an APP1 segment and the crate finds it for us.
// PNG files carry the bare TIFF structure in an eXIf chunk, which the png
// module hands over as raw bytes.
// =============================================================================

use std::io::Cursor;

use super::{Entry, MetadataError};

/// EXIF tags of a JPEG file.
pub fn from_jpeg(bytes: &[u8]) -> Result<Vec<Entry>, MetadataError> {
    let exif = exif::Reader::new().read_from_container(&mut Cursor::new(bytes))?;
    Ok(entries(&exif, ""))
}

/// EXIF tags from a raw TIFF block, keys prefixed with `prefix`.
pub fn from_tiff(data: &[u8], prefix: &str) -> Result<Vec<Entry>, MetadataError> {
    let exif = exif::Reader::new().read_raw(data.to_vec())?;
    Ok(entries(&exif, prefix))
}

fn entries(exif: &exif::Exif, prefix: &str) -> Vec<Entry> {
    exif.fields()
        .map(|field| {
            Entry::new(
                format!("{}{}", prefix, field.tag),
                field.display_value().with_unit(exif).to_string(),
            )
        })
        .collect()
}

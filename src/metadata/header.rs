// src/metadata/header.rs
// GIF and BMP keep their interesting fields at fixed little-endian offsets.

use super::{Entry, MetadataError};

fn u16_le(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_le(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn i32_le(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Logical screen descriptor of a GIF87a/GIF89a file.
pub fn read_gif(bytes: &[u8]) -> Result<Vec<Entry>, MetadataError> {
    let version = match bytes.get(..6) {
        Some(b"GIF87a") => "87a",
        Some(b"GIF89a") => "89a",
        _ => return Err(MetadataError::Signature("GIF")),
    };
    if bytes.len() < 11 {
        return Err(MetadataError::Truncated);
    }

    let has_global_color_table = bytes[10] & 0x80 != 0;

    Ok(vec![
        Entry::new("Version", version),
        Entry::new("Width", u16_le(bytes, 6).to_string()),
        Entry::new("Height", u16_le(bytes, 8).to_string()),
        Entry::new("Global Color Table", has_global_color_table.to_string()),
    ])
}

/// File header and BITMAPINFOHEADER fields of a BMP file.
///
/// Height is signed: a negative value means the rows are stored top-down.
pub fn read_bmp(bytes: &[u8]) -> Result<Vec<Entry>, MetadataError> {
    if !bytes.starts_with(b"BM") {
        return Err(MetadataError::Signature("BMP"));
    }
    if bytes.len() < 30 {
        return Err(MetadataError::Truncated);
    }

    Ok(vec![
        Entry::new("File Size", format!("{} bytes", u32_le(bytes, 2))),
        Entry::new("Width", i32_le(bytes, 18).to_string()),
        Entry::new("Height", i32_le(bytes, 22).to_string()),
        Entry::new("Bits Per Pixel", u16_le(bytes, 28).to_string()),
    ])
}

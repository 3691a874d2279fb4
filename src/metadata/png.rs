// src/metadata/png.rs
// =============================================================================
// Walks the chunk list of a PNG file and decodes the metadata chunks.
//
// Chunk layout: 4-byte big-endian length, 4-byte type, data, 4-byte CRC.
// The CRC is not verified; a chunk running past the end of the file is.
//
// Text chunks:
// - tEXt: keyword NUL text (Latin-1)
// - zTXt: keyword NUL method compressed-text (zlib)
// - iTXt: keyword NUL flag method language NUL translated-keyword NUL text
//   (UTF-8, zlib when flag is 1)
// =============================================================================

use flate2::read::ZlibDecoder;
use std::io::Read;

use super::{tags, Entry, MetadataError};

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub fn read(bytes: &[u8]) -> Result<Vec<Entry>, MetadataError> {
    if !bytes.starts_with(&SIGNATURE) {
        return Err(MetadataError::Signature("PNG"));
    }

    let mut entries = Vec::new();
    let mut pos = SIGNATURE.len();

    while pos < bytes.len() {
        let header = bytes.get(pos..pos + 8).ok_or(MetadataError::Truncated)?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = &header[4..8];

        let start = pos + 8;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= bytes.len())
            .ok_or(MetadataError::Truncated)?;
        let data = &bytes[start..end];

        match kind {
            b"tEXt" => entries.push(text_chunk(data)?),
            b"zTXt" => entries.push(compressed_text_chunk(data)?),
            b"iTXt" => entries.push(international_text_chunk(data)?),
            b"eXIf" => entries.extend(tags::from_tiff(data, "eXIf ")?),
            b"IEND" => break,
            _ => {}
        }

        // skip the CRC
        pos = end + 4;
    }

    Ok(entries)
}

fn split_nul(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let nul = data.iter().position(|&b| b == 0)?;
    Some((&data[..nul], &data[nul + 1..]))
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, MetadataError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

fn text_chunk(data: &[u8]) -> Result<Entry, MetadataError> {
    let (keyword, text) = split_nul(data).ok_or(MetadataError::MalformedChunk("tEXt"))?;
    Ok(Entry::new(format!("tEXt {}", latin1(keyword)), latin1(text)))
}

fn compressed_text_chunk(data: &[u8]) -> Result<Entry, MetadataError> {
    let (keyword, rest) = split_nul(data).ok_or(MetadataError::MalformedChunk("zTXt"))?;
    let (&method, compressed) = rest
        .split_first()
        .ok_or(MetadataError::MalformedChunk("zTXt"))?;
    if method != 0 {
        return Err(MetadataError::Compression(method));
    }

    let text = inflate(compressed)?;
    Ok(Entry::new(format!("zTXt {}", latin1(keyword)), latin1(&text)))
}

fn international_text_chunk(data: &[u8]) -> Result<Entry, MetadataError> {
    let malformed = || MetadataError::MalformedChunk("iTXt");

    let (keyword, rest) = split_nul(data).ok_or_else(malformed)?;
    let (flag, method) = match rest {
        [flag, method, ..] => (*flag, *method),
        _ => return Err(malformed()),
    };
    let (language, rest) = split_nul(&rest[2..]).ok_or_else(malformed)?;
    let (translated, text) = split_nul(rest).ok_or_else(malformed)?;

    let text = if flag == 1 {
        if method != 0 {
            return Err(MetadataError::Compression(method));
        }
        String::from_utf8_lossy(&inflate(text)?).into_owned()
    } else {
        String::from_utf8_lossy(text).into_owned()
    };

    let mut key = format!("iTXt {}", latin1(keyword));
    if !language.is_empty() || !translated.is_empty() {
        key.push_str(&format!(
            " [{}] {}",
            String::from_utf8_lossy(language),
            String::from_utf8_lossy(translated)
        ));
    }

    Ok(Entry::new(key.trim_end(), text))
}

//! Author and creation date from the PDF document information dictionary.

use super::{ExtractError, ExtractResult, MetadataRecord, month_stamp_from_prefix, non_blank};
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

/// Author used when the document does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Reads `/Author` and `/CreationDate` from the trailer's `/Info` dictionary.
///
/// A missing author becomes [`UNKNOWN_AUTHOR`]; a missing or malformed creation
/// date leaves `date` empty. A document without an `/Info` entry is valid and
/// yields those defaults; an `/Info` reference to a missing object is an error.
pub fn extract(path: &Path) -> ExtractResult<MetadataRecord> {
    let pdf_error = |source| ExtractError::Pdf {
        path: path.to_path_buf(),
        source,
    };
    let document = Document::load(path).map_err(pdf_error)?;

    let info = match document.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => Some(document.get_dictionary(*id).map_err(|_| {
            ExtractError::MissingProperty {
                path: path.to_path_buf(),
                name: "Info".to_string(),
            }
        })?),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    let author = info.and_then(|dict| text_entry(dict, b"Author"));
    let date = info
        .and_then(|dict| text_entry(dict, b"CreationDate"))
        .and_then(|raw| month_stamp_from_prefix(raw.trim_start_matches("D:")));

    Ok(MetadataRecord {
        date,
        author: Some(non_blank(author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())),
        title: None,
    })
}

fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// Decodes a PDF text string: UTF-16BE when it starts with a byte order mark,
/// otherwise single-byte PDFDocEncoding (read as Latin-1).
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

//! Capture date from the EXIF block of an image.

use super::{ExtractError, ExtractResult, MetadataRecord};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads `DateTimeOriginal` and returns it as `YYYY-MM-DD`.
///
/// An image without an EXIF block, or whose block lacks the tag, yields a
/// record with no date. A file that cannot be opened, or whose container or
/// EXIF block is corrupt, is an error.
pub fn extract(path: &Path) -> ExtractResult<MetadataRecord> {
    let file = File::open(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        // no EXIF block at all: missing data, not a failure
        Err(exif::Error::NotFound(_)) => return Ok(MetadataRecord::default()),
        Err(source) => {
            return Err(ExtractError::Exif {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let date = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .and_then(|field| match field.value {
            Value::Ascii(ref parts) => parts.first().and_then(|b| std::str::from_utf8(b).ok()),
            _ => None,
        })
        .and_then(exif_day);

    Ok(MetadataRecord {
        date,
        ..MetadataRecord::default()
    })
}

/// `"2022:05:01 10:30:00"` -> `"2022-05-01"`.
fn exif_day(raw: &str) -> Option<String> {
    let day = raw.trim().split(' ').next()?.replace(':', "-");
    if day.is_empty() { None } else { Some(day) }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Minimal JPEG: SOI, an APP1 segment holding a big-endian TIFF block with
    /// IFD0 -> Exif IFD -> DateTimeOriginal, then EOI.
    pub(crate) fn jpeg_with_date(date: &str) -> Vec<u8> {
        let mut value = date.as_bytes().to_vec();
        value.push(0);

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
        // IFD0 at 8: one entry pointing at the Exif IFD (offset 26)
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x8769u16.to_be_bytes());
        tiff.extend_from_slice(&4u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&26u32.to_be_bytes());
        tiff.extend_from_slice(&0u32.to_be_bytes());
        // Exif IFD at 26: DateTimeOriginal stored at offset 44
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x9003u16.to_be_bytes());
        tiff.extend_from_slice(&2u16.to_be_bytes());
        tiff.extend_from_slice(&(value.len() as u32).to_be_bytes());
        tiff.extend_from_slice(&44u32.to_be_bytes());
        tiff.extend_from_slice(&0u32.to_be_bytes());
        tiff.extend_from_slice(&value);

        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend_from_slice(&tiff);

        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&app1);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn test_reads_date_time_original() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("photo.jpg");
        fs::write(&path, jpeg_with_date("2022:05:01 10:30:00")).expect("Failed to write jpeg");

        let record = extract(&path).expect("EXIF should parse");
        assert_eq!(record.date.as_deref(), Some("2022-05-01"));
        assert_eq!(record.author, None);
    }

    #[test]
    fn test_jpeg_without_exif_has_no_date() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("plain.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).expect("Failed to write jpeg");

        let record = extract(&path).expect("missing EXIF is not an error");
        assert_eq!(record.date, None);
        assert_eq!(record, MetadataRecord::default());
    }

    #[test]
    fn test_corrupt_exif_block_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("corrupt.jpg");
        // APP1 Exif segment whose TIFF header has no valid byte order mark
        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend_from_slice(b"XX\x00\x2a\x00\x00\x00\x08");
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&app1);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        fs::write(&path, jpeg).expect("Failed to write jpeg");

        assert!(matches!(extract(&path), Err(ExtractError::Exif { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = extract(&temp_dir.path().join("gone.jpg"));
        assert!(matches!(result, Err(ExtractError::Io { .. })));
    }

    #[test]
    fn test_exif_day() {
        assert_eq!(exif_day("2021:12:31 23:59:59").as_deref(), Some("2021-12-31"));
        assert_eq!(exif_day("2021:12:31").as_deref(), Some("2021-12-31"));
        assert_eq!(exif_day("   ").as_deref(), None);
    }
}

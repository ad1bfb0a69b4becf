//! Plain text carries no embedded metadata; the modification time stands in.

use super::{ExtractError, ExtractResult, MetadataRecord};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// Stamps the file with its last-modified month in the local time zone.
pub fn extract(path: &Path) -> ExtractResult<MetadataRecord> {
    let io_error = |source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    };
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(io_error)?;

    let local: DateTime<Local> = modified.into();
    Ok(MetadataRecord::with_date(local.format("%Y-%m").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use filetime::FileTime;
    use tempfile::TempDir;

    #[test]
    fn test_uses_modification_month() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "hello").expect("Failed to write file");

        // mid-month so no time zone can push it across a boundary
        let stamp = Local
            .with_ymd_and_hms(2023, 3, 15, 12, 0, 0)
            .single()
            .expect("valid local time");
        filetime::set_file_mtime(&path, FileTime::from_unix_time(stamp.timestamp(), 0))
            .expect("Failed to set mtime");

        let record = extract(&path).expect("mtime should be readable");
        assert_eq!(record.date.as_deref(), Some("2023-03"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        assert!(matches!(
            extract(&temp_dir.path().join("gone.txt")),
            Err(ExtractError::Io { .. })
        ));
    }
}

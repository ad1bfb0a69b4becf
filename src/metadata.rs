//! Best-effort metadata extraction for the supported file types.
//!
//! Each extractor reads one kind of file and returns a [`MetadataRecord`] or an
//! [`ExtractError`]. Extractors never substitute defaults themselves: the caller
//! decides what to do on failure (the organizer swaps in the category's default
//! record and reports the error).
//!
//! # Examples
//!
//! ```
//! use tidymeta::metadata::{MetadataRecord, month_stamp};
//!
//! let record = MetadataRecord::with_date("2023-03");
//! assert_eq!(record.date.as_deref(), Some("2023-03"));
//! assert_eq!(month_stamp(2023, 3).as_deref(), Some("2023-03"));
//! ```

pub mod image;
pub mod office;
pub mod pdf;
pub mod text;

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// Semantic fields extracted from a file.
///
/// Every field is optional; a missing value means the property was absent or
/// could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Capture or creation date (`YYYY-MM-DD` for images, `YYYY-MM` otherwise).
    pub date: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document title.
    pub title: Option<String>,
}

impl MetadataRecord {
    /// A record carrying only a date.
    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }
}

impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "{{date: {}, author: {}, title: {}}}",
            field(&self.date),
            field(&self.author),
            field(&self.title)
        )
    }
}

/// Errors that can occur while reading embedded metadata.
#[derive(Debug)]
pub enum ExtractError {
    /// The file could not be opened or read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The image container or its EXIF block could not be parsed.
    Exif { path: PathBuf, source: exif::Error },
    /// The PDF structure could not be parsed.
    Pdf {
        path: PathBuf,
        source: lopdf::Error,
    },
    /// The OOXML zip container could not be read.
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    /// The core properties part is not valid XML.
    Xml { path: PathBuf, reason: String },
    /// A structural entry that must exist was missing.
    MissingProperty { path: PathBuf, name: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            Self::Exif { path, source } => {
                write!(f, "invalid EXIF data in {}: {}", path.display(), source)
            }
            Self::Pdf { path, source } => {
                write!(f, "invalid PDF structure in {}: {}", path.display(), source)
            }
            Self::Archive { path, source } => {
                write!(f, "invalid document container {}: {}", path.display(), source)
            }
            Self::Xml { path, reason } => {
                write!(f, "invalid core properties in {}: {}", path.display(), reason)
            }
            Self::MissingProperty { path, name } => {
                write!(f, "{} has no '{}' entry", path.display(), name)
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Exif { source, .. } => Some(source),
            Self::Pdf { source, .. } => Some(source),
            Self::Archive { source, .. } => Some(source),
            Self::Xml { .. } | Self::MissingProperty { .. } => None,
        }
    }
}

/// Result type for metadata extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Formats a year and month as `YYYY-MM`, rejecting impossible dates.
pub fn month_stamp(year: i32, month: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format("%Y-%m").to_string())
}

/// Parses the leading `YYYY?MM` of a timestamp into a `YYYY-MM` stamp.
///
/// Accepts both `2023-04-15T10:00:00Z` (W3CDTF) and `20230415100000` (PDF)
/// layouts; the separator between year and month is optional.
pub(crate) fn month_stamp_from_prefix(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let year: i32 = raw.get(0..4)?.parse().ok()?;
    let rest = raw.get(4..)?;
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let month: u32 = rest.get(0..2)?.parse().ok()?;
    month_stamp(year, month)
}

/// Trims a property value and drops it if nothing is left.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

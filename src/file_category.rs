/// Routing table from file extensions to metadata extractors and destinations.
///
/// Every supported extension maps to one [`Category`]. A category knows how to
/// extract metadata from its files and how to turn that metadata into a
/// destination folder under the organizing root. Anything unrecognized lands in
/// [`Category::Other`], which has no extractor and always routes to `Others`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tidymeta::file_category::Category;
/// use tidymeta::metadata::MetadataRecord;
///
/// assert_eq!(Category::from_extension("JPG"), Category::Image);
/// assert_eq!(Category::from_extension("xyz"), Category::Other);
///
/// let dest = Category::Image.destination(&MetadataRecord::default(), Path::new("/root"));
/// assert_eq!(dest, Path::new("/root/Images/NoDate"));
/// ```
use crate::metadata::{self, ExtractResult, MetadataRecord};
use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level folder for images.
pub const IMAGES_DIR: &str = "Images";
/// Top-level folder for documents of every kind.
pub const DOCUMENTS_DIR: &str = "Documents";
/// Folder for unrecognized files.
pub const OTHERS_DIR: &str = "Others";

/// Bucket name when no date could be determined.
pub const NO_DATE: &str = "NoDate";

/// A file category with its own extractor and destination rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Photos; grouped by EXIF capture date.
    Image,
    /// PDF documents; grouped by author.
    Pdf,
    /// Word-processor documents; grouped by creation month.
    WordDocument,
    /// Spreadsheets; grouped by title.
    Spreadsheet,
    /// Plain text; grouped by modification month.
    PlainText,
    /// Everything else.
    Other,
}

/// Static extension table. Extensions are lowercase, without the dot.
const ROUTES: &[(&str, Category)] = &[
    ("jpg", Category::Image),
    ("jpeg", Category::Image),
    ("png", Category::Image),
    ("tif", Category::Image),
    ("tiff", Category::Image),
    ("heic", Category::Image),
    ("heif", Category::Image),
    ("webp", Category::Image),
    ("pdf", Category::Pdf),
    ("docx", Category::WordDocument),
    ("xlsx", Category::Spreadsheet),
    ("txt", Category::PlainText),
];

impl Category {
    /// Looks up the category for an extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_lowercase();
        ROUTES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, category)| *category)
            .unwrap_or(Category::Other)
    }

    /// All extensions routed to this category.
    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        ROUTES
            .iter()
            .filter(move |(_, category)| category == self)
            .map(|(ext, _)| *ext)
    }

    /// Whether files of this category are inspected for metadata at all.
    pub fn has_extractor(&self) -> bool {
        !matches!(self, Category::Other)
    }

    /// Runs this category's extractor.
    ///
    /// [`Category::Other`] has none and yields an empty record.
    pub fn extract(&self, path: &Path) -> ExtractResult<MetadataRecord> {
        match self {
            Category::Image => metadata::image::extract(path),
            Category::Pdf => metadata::pdf::extract(path),
            Category::WordDocument => metadata::office::extract_word(path),
            Category::Spreadsheet => metadata::office::extract_spreadsheet(path),
            Category::PlainText => metadata::text::extract(path),
            Category::Other => Ok(MetadataRecord::default()),
        }
    }

    /// The record substituted when extraction fails.
    pub fn default_record(&self) -> MetadataRecord {
        match self {
            Category::Pdf => MetadataRecord {
                author: Some(metadata::pdf::UNKNOWN_AUTHOR.to_string()),
                ..MetadataRecord::default()
            },
            Category::Spreadsheet => MetadataRecord {
                title: Some(metadata::office::UNTITLED.to_string()),
                ..MetadataRecord::default()
            },
            _ => MetadataRecord::default(),
        }
    }

    /// Destination folder relative to the organizing root.
    pub fn relative_destination(&self, record: &MetadataRecord) -> PathBuf {
        let date_bucket = || {
            record
                .date
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DATE.to_string())
        };
        match self {
            Category::Image => Path::new(IMAGES_DIR).join(date_bucket()),
            Category::Pdf => Path::new(DOCUMENTS_DIR).join(segment_or(
                record.author.as_deref(),
                metadata::pdf::UNKNOWN_AUTHOR,
            )),
            Category::Spreadsheet => Path::new(DOCUMENTS_DIR).join(segment_or(
                record.title.as_deref(),
                metadata::office::UNTITLED,
            )),
            Category::WordDocument | Category::PlainText => {
                Path::new(DOCUMENTS_DIR).join(date_bucket())
            }
            Category::Other => PathBuf::from(OTHERS_DIR),
        }
    }

    /// Destination folder for a file with `record`, under `root`.
    pub fn destination(&self, record: &MetadataRecord, root: &Path) -> PathBuf {
        root.join(self.relative_destination(record))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Image => "image",
            Category::Pdf => "PDF",
            Category::WordDocument => "DOCX",
            Category::Spreadsheet => "spreadsheet",
            Category::PlainText => "text",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

/// Keeps only alphanumerics, underscores and hyphens.
///
/// Applied to free-form author and title strings before they become a single
/// folder name, so path separators are dropped as well.
pub fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

/// Keeps only alphanumerics, path separators, underscores and hyphens.
pub fn sanitize_path_str(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || matches!(c, '_' | '-' | '/')
                || *c == std::path::MAIN_SEPARATOR
        })
        .collect()
}

/// Sanitizes the part of `destination` below `root`, leaving `root` untouched.
///
/// A destination outside `root` is sanitized as a whole.
pub fn sanitize_destination(root: &Path, destination: &Path) -> PathBuf {
    match destination.strip_prefix(root) {
        Ok(relative) => root.join(sanitize_path_str(&relative.to_string_lossy())),
        Err(_) => PathBuf::from(sanitize_path_str(&destination.to_string_lossy())),
    }
}

fn segment_or(raw: Option<&str>, fallback: &str) -> String {
    let cleaned = raw.map(sanitize_segment).unwrap_or_default();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: Option<&str>, author: Option<&str>, title: Option<&str>) -> MetadataRecord {
        MetadataRecord {
            date: date.map(str::to_string),
            author: author.map(str::to_string),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(Category::from_extension("jpg"), Category::Image);
        assert_eq!(Category::from_extension("JPEG"), Category::Image);
        assert_eq!(Category::from_extension("Pdf"), Category::Pdf);
        assert_eq!(Category::from_extension("docx"), Category::WordDocument);
        assert_eq!(Category::from_extension("XLSX"), Category::Spreadsheet);
        assert_eq!(Category::from_extension("txt"), Category::PlainText);
    }

    #[test]
    fn test_unknown_extension_is_other() {
        assert_eq!(Category::from_extension("xyz"), Category::Other);
        assert_eq!(Category::from_extension(""), Category::Other);
        assert!(!Category::Other.has_extractor());
    }

    #[test]
    fn test_image_destination_by_date() {
        let root = Path::new("/data");
        assert_eq!(
            Category::Image.destination(&record(Some("2022-05-01"), None, None), root),
            Path::new("/data/Images/2022-05-01")
        );
        assert_eq!(
            Category::Image.destination(&record(None, None, None), root),
            Path::new("/data/Images/NoDate")
        );
    }

    #[test]
    fn test_pdf_destination_sanitizes_author() {
        let dest = Category::Pdf.relative_destination(&record(None, Some("Jane/Doe 2023"), None));
        assert_eq!(dest, Path::new("Documents/JaneDoe2023"));
    }

    #[test]
    fn test_pdf_without_author_is_unknown() {
        assert_eq!(
            Category::Pdf.relative_destination(&record(None, None, None)),
            Path::new("Documents/Unknown")
        );
        // sanitizes to nothing
        assert_eq!(
            Category::Pdf.relative_destination(&record(None, Some("./ "), None)),
            Path::new("Documents/Unknown")
        );
    }

    #[test]
    fn test_spreadsheet_destination_by_title() {
        assert_eq!(
            Category::Spreadsheet.relative_destination(&record(None, None, Some("Q3 Budget!"))),
            Path::new("Documents/Q3Budget")
        );
        assert_eq!(
            Category::Spreadsheet.relative_destination(&record(None, None, None)),
            Path::new("Documents/Untitled")
        );
    }

    #[test]
    fn test_dated_documents() {
        let r = record(Some("2023-03"), None, None);
        assert_eq!(
            Category::PlainText.relative_destination(&r),
            Path::new("Documents/2023-03")
        );
        assert_eq!(
            Category::WordDocument.relative_destination(&record(None, None, None)),
            Path::new("Documents/NoDate")
        );
    }

    #[test]
    fn test_other_ignores_metadata() {
        let r = record(Some("2023-03"), Some("x"), Some("y"));
        assert_eq!(Category::Other.relative_destination(&r), Path::new("Others"));
    }

    #[test]
    fn test_default_records() {
        assert_eq!(
            Category::Pdf.default_record().author.as_deref(),
            Some("Unknown")
        );
        assert_eq!(
            Category::Spreadsheet.default_record().title.as_deref(),
            Some("Untitled")
        );
        assert_eq!(Category::Image.default_record(), MetadataRecord::default());
    }

    #[test]
    fn test_sanitize_segment_law() {
        for raw in ["Jane/Doe 2023", "a.b,c;d", "Ünïcode ok", "tab\there"] {
            let cleaned = sanitize_segment(raw);
            assert!(
                cleaned
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-'),
                "unexpected character in {:?}",
                cleaned
            );
        }
        assert_eq!(sanitize_segment("Jane/Doe 2023"), "JaneDoe2023");
        assert_eq!(sanitize_segment("snake_case-name"), "snake_case-name");
    }

    #[test]
    fn test_sanitize_destination_keeps_root() {
        let root = Path::new("/tmp/.hidden root");
        let dest = root.join("Images").join("2022:05:01");
        assert_eq!(
            sanitize_destination(root, &dest),
            Path::new("/tmp/.hidden root/Images/20220501")
        );
    }

    #[test]
    fn test_extensions_for_category() {
        let images: Vec<_> = Category::Image.extensions().collect();
        assert!(images.contains(&"jpg"));
        assert!(images.contains(&"png"));
        assert_eq!(Category::Pdf.extensions().collect::<Vec<_>>(), vec!["pdf"]);
    }
}

//! Core properties of Office Open XML documents (`.docx`, `.xlsx`).
//!
//! Both formats are zip containers carrying the same `docProps/core.xml` part,
//! so one reader serves word-processor documents and spreadsheets.

use super::{ExtractError, ExtractResult, MetadataRecord, month_stamp_from_prefix, non_blank};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Title used when a spreadsheet does not carry one.
pub const UNTITLED: &str = "Untitled";

const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

#[derive(Debug, Default, Deserialize)]
#[serde(rename = "coreProperties")]
struct CoreProperties {
    #[serde(default, alias = "dc:title")]
    title: Option<String>,
    #[serde(default, alias = "dcterms:created")]
    created: Option<Timestamp>,
}

#[derive(Debug, Default, Deserialize)]
struct Timestamp {
    #[serde(rename = "$text", default)]
    value: String,
}

/// Word-processor document: creation month only.
pub fn extract_word(path: &Path) -> ExtractResult<MetadataRecord> {
    let props = read_core_properties(path)?;
    Ok(MetadataRecord {
        date: created_month(&props),
        ..MetadataRecord::default()
    })
}

/// Spreadsheet: title (default [`UNTITLED`]) and creation month.
pub fn extract_spreadsheet(path: &Path) -> ExtractResult<MetadataRecord> {
    let props = read_core_properties(path)?;
    Ok(MetadataRecord {
        date: created_month(&props),
        author: None,
        title: Some(non_blank(props.title).unwrap_or_else(|| UNTITLED.to_string())),
    })
}

fn created_month(props: &CoreProperties) -> Option<String> {
    props
        .created
        .as_ref()
        .and_then(|ts| month_stamp_from_prefix(&ts.value))
}

/// Opens the container and parses its core properties part.
///
/// A valid container without the part has no properties, which is not an error.
fn read_core_properties(path: &Path) -> ExtractResult<CoreProperties> {
    let archive_error = |source| ExtractError::Archive {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(archive_error)?;

    let mut xml = String::new();
    match archive.by_name(CORE_PROPERTIES_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)
                .map_err(|source| ExtractError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        Err(ZipError::FileNotFound) => return Ok(CoreProperties::default()),
        Err(e) => return Err(archive_error(e)),
    }

    from_xml_str(&xml).map_err(|e| ExtractError::Xml {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    /// Builds a `docProps/core.xml` body from optional title and creation stamp.
    pub(crate) fn core_xml(title: Option<&str>, created: Option<&str>) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        );
        if let Some(title) = title {
            xml.push_str(&format!("<dc:title>{}</dc:title>", title));
        }
        xml.push_str("<dc:creator>Someone</dc:creator>");
        if let Some(created) = created {
            xml.push_str(&format!(
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
                created
            ));
        }
        xml.push_str("</cp:coreProperties>");
        xml
    }

    /// Writes a zip container holding the given parts.
    pub(crate) fn write_container(path: &Path, parts: &[(&str, &str)]) {
        let file = File::create(path).expect("Failed to create container");
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, body) in parts {
            zip.start_file(*name, options).expect("Failed to start part");
            zip.write_all(body.as_bytes()).expect("Failed to write part");
        }
        zip.finish().expect("Failed to finish container");
    }

    #[test]
    fn test_word_creation_month() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("letter.docx");
        let xml = core_xml(None, Some("2021-11-02T08:00:00Z"));
        write_container(&path, &[(CORE_PROPERTIES_PART, &xml)]);

        let record = extract_word(&path).expect("docx should parse");
        assert_eq!(record.date.as_deref(), Some("2021-11"));
        assert_eq!(record.title, None);
    }

    #[test]
    fn test_spreadsheet_title_and_month() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("budget.xlsx");
        let xml = core_xml(Some("Q3 Budget"), Some("2020-07-15T12:00:00Z"));
        write_container(&path, &[(CORE_PROPERTIES_PART, &xml)]);

        let record = extract_spreadsheet(&path).expect("xlsx should parse");
        assert_eq!(record.title.as_deref(), Some("Q3 Budget"));
        assert_eq!(record.date.as_deref(), Some("2020-07"));
    }

    #[test]
    fn test_spreadsheet_without_title_is_untitled() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("sheet.xlsx");
        let xml = core_xml(None, None);
        write_container(&path, &[(CORE_PROPERTIES_PART, &xml)]);

        let record = extract_spreadsheet(&path).expect("xlsx should parse");
        assert_eq!(record.title.as_deref(), Some(UNTITLED));
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_container_without_core_part_has_no_properties() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("minimal.docx");
        write_container(&path, &[("word/document.xml", "<w:document/>")]);

        let record = extract_word(&path).expect("docx should parse");
        assert_eq!(record, MetadataRecord::default());
    }

    #[test]
    fn test_non_zip_is_archive_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("fake.docx");
        fs::write(&path, "not a zip").expect("Failed to write file");

        assert!(matches!(
            extract_word(&path),
            Err(ExtractError::Archive { .. })
        ));
    }
}

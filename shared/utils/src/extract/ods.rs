//! ODS reader.
//!
//! An ODS file is a zip archive whose `content.xml` holds the sheet as
//! OpenDocument XML. The structured path walks the `text:p` paragraphs of
//! that document. When the archive or the XML is broken the same member is
//! re-read as plain text and scanned with code-shaped regexes instead.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

use reportsync_models::{ExtractionOutcome, Identifier, RawRecord};

use super::selector::{split_on_first_separator, OrderedIdentifiers};
use crate::error::{ExtractionError, ExtractionOutput};

pub const TEXT_NAMESPACE: &[u8] = b"urn:oasis:names:tc:opendocument:xmlns:text:1.0";
pub const CONTENT_MEMBER: &str = "content.xml";

const MIN_FRAGMENT_CHARS: usize = 2;
const MAX_FRAGMENT_CHARS: usize = 50;

/// Reasons the structured walk gives up
#[derive(Debug, Error)]
pub enum StructuredParseError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive has no XML content document")]
    MissingContent,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("content document does not use the OpenDocument text namespace")]
    MissingTextNamespace,
}

/// Output of reading one ODS file
#[derive(Debug)]
pub struct OdsExtraction {
    pub outcome: ExtractionOutcome,
    pub records: Vec<RawRecord>,
    /// Set when the structured walk failed and the regex scan was used
    pub fallback_reason: Option<String>,
}

/// Paragraph-walking ODS reader with regex fallback
#[derive(Debug, Clone)]
pub struct OdsReader {
    separators: Vec<char>,
    expand_product_ids: bool,
}

impl OdsReader {
    pub fn new(separators: &[char]) -> Self {
        Self {
            separators: separators.to_vec(),
            expand_product_ids: false,
        }
    }

    /// Also emit the bare product id after each composite code
    pub fn with_product_ids(mut self, expand: bool) -> Self {
        self.expand_product_ids = expand;
        self
    }

    pub fn read(&self, path: &Path) -> ExtractionOutput<OdsExtraction> {
        match self.read_structured(path) {
            Ok((identifiers, records)) => {
                debug!(
                    path = %path.display(),
                    paragraphs = records.len(),
                    identifiers = identifiers.len(),
                    "Structured ODS extraction finished"
                );
                Ok(OdsExtraction {
                    outcome: ExtractionOutcome::Structured(identifiers),
                    records,
                    fallback_reason: None,
                })
            }
            Err(reason) => {
                warn!(
                    path = %path.display(),
                    error = %reason,
                    "Structured ODS parse failed, scanning raw content"
                );
                let content = read_content_document(path).map_err(|e| {
                    ExtractionError::unreadable(path, format!("{}; raw scan: {}", reason, e))
                })?;
                let identifiers = heuristic_identifiers(&String::from_utf8_lossy(&content));
                let records = identifiers
                    .iter()
                    .enumerate()
                    .map(|(idx, id)| RawRecord::new(id.as_str(), idx, 0))
                    .collect();

                Ok(OdsExtraction {
                    outcome: ExtractionOutcome::Heuristic(identifiers),
                    records,
                    fallback_reason: Some(reason.to_string()),
                })
            }
        }
    }

    fn read_structured(
        &self,
        path: &Path,
    ) -> Result<(Vec<Identifier>, Vec<RawRecord>), StructuredParseError> {
        let content = read_content_document(path)?;
        let paragraphs = paragraph_texts(&content)?;

        let records = paragraphs
            .iter()
            .enumerate()
            .map(|(idx, text)| RawRecord::new(text.as_str(), idx, 0))
            .collect();

        Ok((self.fragments_to_identifiers(&paragraphs), records))
    }

    /// Keep short digit-bearing fragments, splitting multi-code cells
    pub fn fragments_to_identifiers(&self, fragments: &[String]) -> Vec<Identifier> {
        let mut identifiers = OrderedIdentifiers::new();

        for fragment in fragments {
            let chars = fragment.chars().count();
            if !(MIN_FRAGMENT_CHARS..=MAX_FRAGMENT_CHARS).contains(&chars) || !has_digit(fragment) {
                continue;
            }
            for part in split_on_first_separator(fragment, &self.separators) {
                if has_digit(part) {
                    identifiers.push_expanded(part, self.expand_product_ids);
                }
            }
        }

        identifiers.into_vec()
    }
}

/// Bytes of `content.xml`, or of the first `.xml` member when it is absent.
/// The archive handle is dropped before returning.
pub fn read_content_document(path: &Path) -> Result<Vec<u8>, StructuredParseError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let member = if archive.file_names().any(|name| name == CONTENT_MEMBER) {
        CONTENT_MEMBER.to_string()
    } else {
        archive
            .file_names()
            .find(|name| name.to_lowercase().ends_with(".xml"))
            .map(str::to_string)
            .ok_or(StructuredParseError::MissingContent)?
    };

    let mut content = Vec::new();
    archive.by_name(&member)?.read_to_end(&mut content)?;
    Ok(content)
}

/// Trimmed, non-empty text of every `text:p` element
pub fn paragraph_texts(xml: &[u8]) -> Result<Vec<String>, StructuredParseError> {
    let mut reader = NsReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut saw_text_namespace = false;

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        let in_text_ns = matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == TEXT_NAMESPACE);
        saw_text_namespace |= in_text_ns;

        match event {
            Event::Start(e) if in_text_ns && e.local_name().as_ref() == b"p" => {
                current = Some(String::new());
            }
            Event::End(e) if in_text_ns && e.local_name().as_ref() == b"p" => {
                if let Some(text) = current.take() {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        paragraphs.push(trimmed.to_string());
                    }
                }
            }
            Event::Empty(e) if in_text_ns => {
                if let Some(text) = current.as_mut() {
                    push_inline_element(text, &e);
                }
            }
            Event::Text(e) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_text_namespace {
        return Err(StructuredParseError::MissingTextNamespace);
    }
    Ok(paragraphs)
}

/// Whitespace elements that may appear inside a paragraph
fn push_inline_element(text: &mut String, element: &BytesStart<'_>) {
    match element.local_name().as_ref() {
        b"s" => {
            let count = element
                .try_get_attribute("text:c")
                .ok()
                .flatten()
                .and_then(|attr| std::str::from_utf8(&attr.value).ok()?.parse::<usize>().ok())
                .unwrap_or(1);
            text.extend(std::iter::repeat(' ').take(count));
        }
        b"tab" => text.push('\t'),
        b"line-break" => text.push('\n'),
        _ => {}
    }
}

fn heuristic_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // generic alphanumeric codes
            Regex::new(r"\b[A-Za-z0-9][A-Za-z0-9_-]{2,29}\b").expect("static pattern"),
            // pure numeric codes
            Regex::new(r"\b\d{4,}\b").expect("static pattern"),
            // letters then digits
            Regex::new(r"\b[A-Za-z]+\d+\b").expect("static pattern"),
            // digits then letters
            Regex::new(r"\b\d+[A-Za-z]+\b").expect("static pattern"),
        ]
    })
}

/// Best-effort scan of raw document text for code-shaped tokens
pub fn heuristic_identifiers(text: &str) -> BTreeSet<Identifier> {
    let mut found = BTreeSet::new();
    for pattern in heuristic_patterns() {
        for m in pattern.find_iter(text) {
            if has_digit(m.as_str()) {
                if let Some(id) = Identifier::parse(m.as_str()) {
                    found.insert(id);
                }
            }
        }
    }
    found
}

fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    fn content_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
<office:body><office:spreadsheet><table:table table:name="Arkusz1">{}</table:table></office:spreadsheet></office:body>
</office:document-content>"#,
            body
        )
    }

    fn cell(text: &str) -> String {
        format!("<table:table-row><table:table-cell><text:p>{}</text:p></table:table-cell></table:table-row>", text)
    }

    fn write_archive(members: &[(&str, &str)]) -> NamedTempFile {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in members {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(&buf).unwrap();
        tmp
    }

    fn reader() -> OdsReader {
        OdsReader::new(&['\n', ',', ';'])
    }

    #[test]
    fn test_structured_extraction_keeps_order() {
        let body = format!("{}{}{}", cell("Kod"), cell("119133-2097"), cell("119140"));
        let tmp = write_archive(&[("mimetype", "application/vnd.oasis.opendocument.spreadsheet"), ("content.xml", &content_xml(&body))]);

        let result = reader().read(tmp.path()).unwrap();
        assert!(result.fallback_reason.is_none());
        match result.outcome {
            ExtractionOutcome::Structured(ids) => {
                let ids: Vec<&str> = ids.iter().map(|i| i.as_str()).collect();
                assert_eq!(ids, vec!["119133-2097", "119140"]);
            }
            other => panic!("expected structured outcome, got {:?}", other),
        }
        assert_eq!(result.records.len(), 3);
    }

    #[test]
    fn test_structured_extraction_expands_product_ids() {
        let body = format!("{}{}{}{}", cell("Kod"), cell("119133-2097"), cell("119140"), cell("119133-2100"));
        let tmp = write_archive(&[("content.xml", &content_xml(&body))]);

        let result = reader().with_product_ids(true).read(tmp.path()).unwrap();
        let ids: Vec<&str> = result.outcome.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["119133-2097", "119133", "119140", "119133-2100"]);
    }

    #[test]
    fn test_paragraph_text_includes_spans_and_spacing() {
        let xml = content_xml(&cell(r#"<text:span>AB</text:span>-<text:s text:c="2"/>12<text:line-break/>CD-34"#));
        let paragraphs = paragraph_texts(xml.as_bytes()).unwrap();
        assert_eq!(paragraphs, vec!["AB-  12\nCD-34"]);
    }

    #[test]
    fn test_fragment_filters() {
        let fragments: Vec<String> = [
            "1",                          // too short
            "no digits here",             // no digit
            "A-1; B-2",                   // split on semicolon
            "X1\nlabel,Y2",               // newline wins over comma
            "123456789012345678901234567890123456789012345678901", // 51 chars
            "A-1",                        // duplicate
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let ids: Vec<String> = reader()
            .fragments_to_identifiers(&fragments)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(ids, vec!["A-1", "B-2", "X1", "label,Y2"]);
    }

    #[test]
    fn test_invalid_xml_falls_back_to_regex_scan() {
        let broken = r#"<office:document-content xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><text:p>foo123 bar456</text:span></office:document-content>"#;
        let tmp = write_archive(&[("content.xml", broken)]);

        let result = reader().read(tmp.path()).unwrap();
        assert!(result.fallback_reason.is_some());
        match result.outcome {
            ExtractionOutcome::Heuristic(ids) => {
                assert!(ids.contains(&Identifier::parse("foo123").unwrap()));
                assert!(ids.contains(&Identifier::parse("bar456").unwrap()));
                assert!(ids.iter().all(|id| id.has_digit()));
            }
            other => panic!("expected heuristic outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_text_namespace_falls_back() {
        let tmp = write_archive(&[("content.xml", "<doc><p>SKU-777</p></doc>")]);
        let result = reader().read(tmp.path()).unwrap();
        assert!(result.outcome.is_heuristic());
        assert!(result
            .outcome
            .iter()
            .any(|id| id.as_str() == "SKU-777"));
    }

    #[test]
    fn test_first_xml_member_used_without_content_xml() {
        let tmp = write_archive(&[("notes.txt", "ignored 9999"), ("data.xml", &content_xml(&cell("ABC-12")))]);
        let bytes = read_content_document(tmp.path()).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("ABC-12"));
    }

    #[test]
    fn test_not_an_archive_is_unreadable() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"plain text, not a zip").unwrap();
        let err = reader().read(tmp.path()).unwrap_err();
        assert_eq!(err.error_code(), "UNREADABLE_FILE");
    }

    #[test]
    fn test_heuristic_patterns() {
        let ids = heuristic_identifiers("order 2024 for ABC12 and 12kg, plus xyz and a1");
        let ids: Vec<&str> = ids.iter().map(|i| i.as_str()).collect();
        assert!(ids.contains(&"2024"));
        assert!(ids.contains(&"ABC12"));
        assert!(ids.contains(&"12kg"));
        assert!(ids.contains(&"a1"));
        assert!(!ids.contains(&"xyz"));
    }
}

//! DOCX text extraction.
//!
//! A DOCX file is a zip container; the body lives in `word/document.xml`.
//! Each `<w:p>` paragraph becomes one line of output. Only `<w:t>` runs
//! contribute text, so field codes and deleted revisions are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use reqmap_core::{ExtractionError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let file = File::open(path)
            .map_err(|e| ExtractionError::OpenError(format!("{}: {}", path.display(), e)))?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| ExtractionError::Malformed(format!("not a DOCX container: {}", e)))?;
        let part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ExtractionError::Malformed(format!("{}: {}", DOCUMENT_PART, e)))?;
        paragraphs_from_xml(BufReader::new(part))
    }
}

/// Collect the non-blank paragraphs of a WordprocessingML body, one per line.
///
/// `<w:tab/>` becomes a tab and `<w:br/>`/`<w:cr/>` a line break inside the
/// paragraph. Paragraphs nested in text boxes are folded into the paragraph
/// that holds them.
pub fn paragraphs_from_xml<R: BufRead>(reader: R) -> Result<String, ExtractionError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" if depth > 0 => current.push('\t'),
                b"br" | b"cr" if depth > 0 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text && depth > 0 => {
                let text = e
                    .unescape()
                    .map_err(|err| ExtractionError::Malformed(format!("bad text run: {}", err)))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" if depth > 0 => {
                    depth -= 1;
                    if depth == 0 && !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Malformed(format!(
                    "XML error at position {}: {}",
                    xml.error_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(paragraphs = paragraphs.len(), "read DOCX body");
    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            inner
        )
    }

    #[test]
    fn test_one_line_per_paragraph() {
        let xml = body(
            "<w:p><w:r><w:t>1.1 כללי</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">תשתית </w:t></w:r><w:r><w:t>גז</w:t></w:r></w:p>",
        );
        let text = paragraphs_from_xml(xml.as_bytes()).unwrap();
        assert_eq!(text, "1.1 כללי\nתשתית גז");
    }

    #[test]
    fn test_blank_paragraphs_are_dropped() {
        let xml = body(
            "<w:p/><w:p><w:r><w:t>   </w:t></w:r></w:p>\
             <w:p><w:r><w:t>תוכן</w:t></w:r></w:p><w:p></w:p>",
        );
        assert_eq!(paragraphs_from_xml(xml.as_bytes()).unwrap(), "תוכן");
    }

    #[test]
    fn test_tabs_and_breaks() {
        let xml = body("<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>");
        assert_eq!(paragraphs_from_xml(xml.as_bytes()).unwrap(), "a\tb\nc");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = body("<w:p><w:r><w:t>גפ&quot;מ &amp; גז</w:t></w:r></w:p>");
        assert_eq!(paragraphs_from_xml(xml.as_bytes()).unwrap(), "גפ\"מ & גז");
    }

    #[test]
    fn test_non_text_runs_are_ignored() {
        let xml = body(
            "<w:p><w:r><w:instrText>PAGE</w:instrText></w:r>\
             <w:r><w:delText>נמחק</w:delText></w:r><w:r><w:t>נשאר</w:t></w:r></w:p>",
        );
        assert_eq!(paragraphs_from_xml(xml.as_bytes()).unwrap(), "נשאר");
    }

    #[test]
    fn test_table_cells_are_paragraphs() {
        let xml = body(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>תא א</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>תא ב</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        );
        assert_eq!(paragraphs_from_xml(xml.as_bytes()).unwrap(), "תא א\nתא ב");
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let xml = body("<w:p><w:r><w:t>x</w:r></w:p>");
        assert!(matches!(
            paragraphs_from_xml(xml.as_bytes()),
            Err(ExtractionError::Malformed(_))
        ));
    }

    #[test]
    fn test_not_a_zip_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"plain bytes").unwrap();
        assert!(matches!(
            DocxExtractor.extract_text(&path),
            Err(ExtractionError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        assert!(matches!(
            DocxExtractor.extract_text(Path::new("/nonexistent/file.docx")),
            Err(ExtractionError::OpenError(_))
        ));
    }
}

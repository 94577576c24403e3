//! Builds a minimal DOCX on disk and runs it through ingest and parsing.
#![cfg(feature = "docx")]

use std::io::Write;
use std::path::Path;

use reqmap_core::RequirementKey;
use reqmap_ingest::{extract_text, parse_path};
use reqmap_parsing::{DisplayRepairer, DocumentParser, ParsingConfig};
use zip::write::SimpleFileOptions;

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

#[test]
fn docx_text_has_one_line_per_paragraph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regs.docx");
    write_docx(&path, &["1.1 כללי", "", "תשתית גז בבניין"]);

    assert_eq!(extract_text(&path).unwrap(), "1.1 כללי\nתשתית גז בבניין");
}

#[test]
fn docx_is_classified_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regs.docx");
    write_docx(
        &path,
        &[
            "1.1 כללי",
            "תשתית גז בבניין",
            "2.2 ישיבה",
            "מקומות ישיבה מקסימליים: 50",
            "3.1 שונות",
            "הוראות שאינן נוגעות לאף קטגוריה",
        ],
    );

    let parser =
        DocumentParser::with_config(ParsingConfig::default(), DisplayRepairer::fallback_only());
    let doc = parse_path(&path, &parser).unwrap();

    assert_eq!(doc.source_file, path.display().to_string());
    let keys: Vec<RequirementKey> = doc.parsed.iter().map(|s| s.key).collect();
    assert_eq!(keys, vec![RequirementKey::GasUsage, RequirementKey::Seating]);
    assert_eq!(doc.parsed[0].heading, "1.1 יללכ");
}

#[test]
fn docx_without_document_part_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.docx");
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("readme.txt", SimpleFileOptions::default()).unwrap();
    zip.write_all(b"nothing here").unwrap();
    zip.finish().unwrap();

    let err = extract_text(&path).unwrap_err();
    assert!(err.to_string().contains("word/document.xml"), "{}", err);
}

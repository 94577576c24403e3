//! End-to-end tests for sectioning and classification on extracted text.

use reqmap_parsing::{
    DisplayRepairer, DocumentParser, ParsingConfig, RequirementKey, normalize_text,
};

const SAMPLE: &str = "1.1 כללי\nתשתית גז בבניין\n2.2 ישיבה\nמקומות ישיבה מקסימליים: 50";

fn fallback_parser() -> DocumentParser {
    DocumentParser::with_config(ParsingConfig::default(), DisplayRepairer::fallback_only())
}

#[test]
fn sample_document_maps_gas_and_seating() {
    let parser = fallback_parser();

    let sections = parser.sections(SAMPLE);
    assert_eq!(sections.len(), 2, "sections: {:?}", sections);

    let classified = parser.classify_text(SAMPLE);
    assert_eq!(classified.len(), 2);
    assert_eq!(classified[0].key, RequirementKey::GasUsage);
    assert_eq!(classified[0].heading, "1.1 יללכ");
    assert_eq!(classified[1].key, RequirementKey::Seating);
    assert_eq!(classified[1].heading, "2.2 הבישי");
}

#[test]
fn sample_document_with_default_repairer() {
    let parser = DocumentParser::new();
    let repairer = parser.segmenter().repairer().clone();

    let classified = parser.classify_text(SAMPLE);
    assert_eq!(classified.len(), 2);
    assert_eq!(classified[0].key, RequirementKey::GasUsage);
    assert_eq!(classified[0].heading, repairer.fix_display_order("1.1 כללי"));
    assert_eq!(classified[0].context, repairer.fix_display_order("תשתית גז בבניין"));
    assert_eq!(classified[1].key, RequirementKey::Seating);
    assert_eq!(classified[1].heading, repairer.fix_display_order("2.2 ישיבה"));
}

#[test]
fn document_without_headings_has_one_sentinel_section() {
    let text = "This document has no headings.\nIt only has body text, in English.";
    let sections = fallback_parser().sections(text);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].heading, "Introduction");
}

#[test]
fn raw_sections_cover_every_body_line_in_order() {
    let text = concat!(
        "preamble, before any heading\n",
        "\n",
        "1.1 כללי\n",
        "תנאים כלליים, לכל העסקים\n",
        "4.2 אחסון מזון\n",
        "   אחסון בשר בנפרד   \n",
        "\n",
        "הפרדה בשר וחלבי, במקרר נפרד\n",
        "5.1 קהל\n",
        "6.1 תפוסה\n",
        "תפוסה מותרת: 120 איש\n",
    );
    let parser = fallback_parser();
    let sections = parser.sections(text);

    let headings: Vec<usize> = normalize_text(text)
        .lines()
        .enumerate()
        .filter(|(_, l)| {
            parser.segmenter().heading_kind(l).is_some() && l.starts_with(char::is_numeric)
        })
        .map(|(i, _)| i)
        .collect();
    let expected: Vec<String> = normalize_text(text)
        .lines()
        .enumerate()
        .filter(|(i, l)| !l.is_empty() && !headings.contains(i))
        .map(|(_, l)| l.to_string())
        .collect();
    let actual: Vec<String> = sections
        .iter()
        .flat_map(|s| s.raw.lines().map(str::to_string))
        .collect();
    assert_eq!(actual, expected);

    // "5.1 קהל" has no body and yields no section of its own
    assert_eq!(sections.len(), 4);
}

#[test]
fn classification_keeps_only_unambiguous_sections() {
    let text = concat!(
        "1.1 גז\n",
        "גז במטבח, גז במחסן, גז בחצר\n",
        "1.2 מעורב\n",
        "גז ובשר, גז עם דגים, בשר\n",
        "1.3 שונות\n",
        "שעות פתיחה, ניקיון ותחזוקה\n",
    );
    let classified = fallback_parser().classify_text(text);
    assert_eq!(classified.len(), 1);
    assert_eq!(classified[0].key, RequirementKey::GasUsage);
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = std::sync::Arc::new(fallback_parser());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = std::sync::Arc::clone(&parser);
            std::thread::spawn(move || parser.classify_text(SAMPLE).len())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 2);
    }
}

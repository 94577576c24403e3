use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use reqmap_core::{ParsedDocument, RequirementKey, Section};
use reqmap_parsing::SectionScores;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the per-category tally after a `process` run.
pub fn print_process_summary(
    w: &mut dyn Write,
    doc: &ParsedDocument,
    output_path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Mapped {} -> {}", doc.source_file, output_path.display())?;

    let sep = "=".repeat(40);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
    }

    for (key, count) in doc.counts() {
        let label = format!("{:<14}", key.as_str());
        let noun = if count == 1 { "section" } else { "sections" };
        if !color.enabled() {
            writeln!(w, "  {} {} {}", label, count, noun)?;
        } else if count > 0 {
            writeln!(w, "  {} {} {}", label.cyan(), count.green(), noun)?;
        } else {
            writeln!(w, "  {} {}", label.cyan(), format!("{} {}", count, noun).dimmed())?;
        }
    }

    writeln!(w, "  {:<14} {}", "total", doc.parsed.len())?;
    Ok(())
}

/// Header line for the `sections` dry run.
pub fn print_dry_run_header(
    w: &mut dyn Write,
    file_name: &str,
    sections: usize,
    strategy: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} sections, display order: {})\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            sections,
            strategy
        )?;
    } else {
        writeln!(
            w,
            "DRY RUN: {} ({} sections, display order: {})\n",
            file_name, sections, strategy
        )?;
    }
    Ok(())
}

/// One section of the dry run: heading, score breakdown, verdict and a
/// preview of the repaired body.
pub fn print_section(
    w: &mut dyn Write,
    index: usize,
    section: &Section,
    scores: &SectionScores,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "[{}] {}", index + 1, section.heading.bold())?;
    } else {
        writeln!(w, "[{}] {}", index + 1, section.heading)?;
    }

    let breakdown = scores
        .iter()
        .map(|(k, s)| format!("{}={}", k, s))
        .collect::<Vec<_>>()
        .join(" ");
    match scores.verdict() {
        Some(key) if color.enabled() => {
            writeln!(w, "    {} -> {}", breakdown.dimmed(), key.green())?
        }
        Some(key) => writeln!(w, "    {} -> {}", breakdown, key)?,
        None if color.enabled() => {
            writeln!(w, "    {} -> {}", breakdown.dimmed(), "unclassified".yellow())?
        }
        None => writeln!(w, "    {} -> unclassified", breakdown)?,
    }

    let preview = truncate(&section.text.replace('\n', " "), 160);
    if color.enabled() {
        writeln!(w, "    {}", preview.dimmed())?;
    } else {
        writeln!(w, "    {}", preview)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Closing tally for the dry run.
pub fn print_dry_run_summary(
    w: &mut dyn Write,
    verdicts: &[Option<RequirementKey>],
    color: ColorMode,
) -> std::io::Result<()> {
    let sep = "=".repeat(40);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "SUMMARY".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "SUMMARY")?;
        writeln!(w, "{}", sep)?;
    }

    for key in RequirementKey::ALL {
        let count = verdicts.iter().filter(|v| **v == Some(key)).count();
        writeln!(w, "  {:<14} {}", key.as_str(), count)?;
    }
    let unclassified = verdicts.iter().filter(|v| v.is_none()).count();
    if color.enabled() && unclassified > 0 {
        writeln!(w, "  {:<14} {}", "unclassified".yellow(), unclassified)?;
    } else {
        writeln!(w, "  {:<14} {}", "unclassified", unclassified)?;
    }
    Ok(())
}

/// Cut `s` to at most `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqmap_core::ClassifiedSection;

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("אבגדה", 3), "אבג...");
        assert_eq!(truncate("אבג", 3), "אבג");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_process_summary_plain() {
        let doc = ParsedDocument {
            source_file: "regs.pdf".into(),
            parsed: vec![ClassifiedSection {
                key: RequirementKey::Seating,
                heading: "h".into(),
                context: "c".into(),
            }],
        };
        let out = render(|w| {
            print_process_summary(w, &doc, Path::new("processed.json"), ColorMode(false))
        });
        assert!(out.starts_with("Mapped regs.pdf -> processed.json\n"));
        assert!(out.contains("  gas_usage      0 sections\n"));
        assert!(out.contains("  seating        1 section\n"));
        assert!(out.contains("  total          1\n"));
    }

    #[test]
    fn test_section_line_shows_verdict() {
        let parser = reqmap_parsing::DocumentParser::with_config(
            reqmap_parsing::ParsingConfig::default(),
            reqmap_parsing::DisplayRepairer::fallback_only(),
        );
        let sections = parser.sections("1.1 כללי\nתשתית גז בבניין");
        let scores = parser.score(&sections[0]);
        let out = render(|w| print_section(w, 0, &sections[0], &scores, ColorMode(false)));
        assert!(out.starts_with("[1] 1.1 יללכ\n"), "{}", out);
        assert!(out.contains("-> gas_usage"), "{}", out);
    }

    #[test]
    fn test_dry_run_summary_counts_unclassified() {
        let verdicts = [Some(RequirementKey::GasUsage), None, None];
        let out = render(|w| print_dry_run_summary(w, &verdicts, ColorMode(false)));
        assert!(out.contains("  gas_usage      1\n"));
        assert!(out.contains("  unclassified   2\n"));
    }
}

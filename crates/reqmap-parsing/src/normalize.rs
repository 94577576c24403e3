use unicode_normalization::UnicodeNormalization;

/// Canonicalize text for matching and display.
///
/// NFKC-folds the input, drops RLM/LRM marks, collapses whitespace runs
/// inside each line to a single space and trims every line. Leading and
/// trailing blank lines are removed; inner line breaks are kept.
pub fn normalize_text(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    // Drop marks before folding so they cannot block composition.
    let folded: String = s
        .chars()
        .filter(|&c| c != '\u{200F}' && c != '\u{200E}')
        .nfkc()
        .collect();

    let lines: Vec<String> = split_lines(&folded)
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    lines.join("\n").trim().to_string()
}

/// Line boundaries besides `\r\n`: the ASCII breaks, the C1 next-line
/// control and the Unicode line/paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0B'
            | '\x0C'
            | '\x1C'
            | '\x1D'
            | '\x1E'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split into lines, treating `\r\n` as a single break.
fn split_lines(s: &str) -> impl Iterator<Item = &str> {
    s.split("\r\n").flat_map(|l| l.split(is_line_break))
}

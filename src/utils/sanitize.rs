//! Free-text hygiene shared by the report builder and every exporter.

/// Characters that make a spreadsheet application read a cell as a formula.
const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Prefix placed in front of text that would otherwise be read as a formula.
pub const FORMULA_ESCAPE: char = '\'';

/// Drop control characters (newlines become spaces) and cap the length in chars.
pub fn clean_text(s: &str, limit: usize) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .take(limit)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Keep only what a measured value can contain: digits, sign, separators, spaces.
pub fn clean_numeric(s: &str, limit: usize) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | ' ' | '/'))
        .take(limit)
        .collect::<String>()
        .trim()
        .to_string()
}

/// True when the label should become a numeric cell.
pub fn is_numeric_label(s: &str) -> bool {
    !s.is_empty()
        && s.trim() == s
        && s.chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && s.chars().any(|c| c.is_ascii_digit())
        && s.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Neutralize text that a spreadsheet would evaluate.
pub fn escape_formula(s: &str) -> String {
    match s.chars().next() {
        Some(c) if FORMULA_TRIGGERS.contains(&c) => format!("{FORMULA_ESCAPE}{s}"),
        _ => s.to_string(),
    }
}

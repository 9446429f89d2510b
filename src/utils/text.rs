// src/utils/text.rs

//! Text helpers shared by extraction, signature building and reporting.

use std::sync::LazyLock;

use regex::Regex;

/// Date-like cell: two-digit day and month, four-digit year, `.` or `/`
/// separators in any mix.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}[./]\d{2}[./]\d{4}").expect("date pattern is a valid regex")
});

/// Carrier date stamp with one separator throughout: `DD/MM/YYYY` or `DD.MM.YYYY`.
static STAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}/\d{2}/\d{4}|\d{2}\.\d{2}\.\d{4}").expect("stamp pattern is a valid regex")
});

/// Check whether the text contains a date-like value.
pub fn contains_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

/// Check whether the text contains a carrier date stamp.
pub fn contains_date_stamp(text: &str) -> bool {
    STAMP_PATTERN.is_match(text)
}

/// Check whether the text contains any Hebrew-script character.
pub fn contains_hebrew(text: &str) -> bool {
    text.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c))
}

/// Length in characters (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keep at most `max` characters of the text.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Collapse every whitespace run into a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

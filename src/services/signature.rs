// src/services/signature.rs

//! Event signature builder.
//!
//! A signature is one canonical string standing for "the latest known
//! event". Carrier history is append-only and ascending, so the last
//! matching record or line is always preferred.

use crate::models::{EventRecord, dated};
use crate::utils::text::{char_len, contains_date, contains_hebrew, normalize_whitespace, truncate_chars};

/// Delimiter joining the fields of a record into a signature.
pub const FIELD_DELIMITER: &str = "|";

/// Characters of raw text used by the last-resort signature.
const RAW_PREFIX_CHARS: usize = 200;

/// Build the signature for a page's events, falling back to raw text.
///
/// Never fails; returns an empty string when there is nothing to use.
pub fn build_signature(events: &[EventRecord], raw: &str) -> String {
    if let Some(latest) = dated(events).last().or_else(|| events.last()) {
        return latest.join(FIELD_DELIMITER);
    }

    if raw.is_empty() {
        return String::new();
    }
    signature_from_raw(raw)
}

fn signature_from_raw(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| char_len(line) > 2)
        .collect();

    if let Some(line) = lines.iter().rev().find(|line| contains_date(line)) {
        return line.to_string();
    }

    if let Some(line) = lines
        .iter()
        .rev()
        .find(|line| contains_hebrew(line) && char_len(line) > 5)
    {
        return line.to_string();
    }

    normalize_whitespace(truncate_chars(raw, RAW_PREFIX_CHARS))
}

/// Render a stored signature for people: fields joined with ` · `.
pub fn display_signature(signature: &str) -> String {
    signature.split(FIELD_DELIMITER).collect::<Vec<_>>().join(" · ")
}

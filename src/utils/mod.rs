//! Utility functions and helpers.

pub mod html;
pub mod text;

/// Normalize a tracking identifier: trimmed and uppercased.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

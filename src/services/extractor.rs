// src/services/extractor.rs

//! Tracking page extractor.
//!
//! Turns the row-like fragments and visible text of a tracking page into a
//! [`PageSnapshot`]. Carrier markup is unstable, so extraction never fails:
//! an unreadable page degrades to `found = false` or to a raw-text-only
//! snapshot.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{EventRecord, ExtractionConfig, KeywordStrategy, PageSnapshot};
use crate::utils::html::{body_text, inner_text};
use crate::utils::text::{char_len, contains_date_stamp, truncate_chars};

/// Minimum text length for a result section to count as an event.
const MIN_SECTION_CHARS: usize = 20;

/// Row-and-cell fragments of a fetched page plus its visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSource {
    /// Cell texts of each row-like fragment, in document order
    pub rows: Vec<Vec<String>>,

    /// Texts of coarse result sections, in document order
    pub sections: Vec<String>,

    /// Visible text of the whole document
    pub text: String,
}

impl PageSource {
    /// Collect fragments from a parsed document using the configured selectors.
    pub fn from_html(document: &Html, config: &ExtractionConfig) -> Result<Self> {
        let row_sel = parse_selector(&config.row_selector)?;
        let cell_sel = parse_selector(&config.cell_selector)?;
        let section_sel = parse_selector(&config.section_selector)?;

        let rows = document
            .select(&row_sel)
            .map(|row| row.select(&cell_sel).map(inner_text).collect())
            .collect();

        let sections = document.select(&section_sel).map(inner_text).collect();

        Ok(Self {
            rows,
            sections,
            text: body_text(document),
        })
    }
}

/// Extractor bound to a keyword strategy and extraction limits.
pub struct Extractor<'a> {
    keywords: &'a KeywordStrategy,
    max_raw_chars: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(keywords: &'a KeywordStrategy, max_raw_chars: usize) -> Self {
        Self {
            keywords,
            max_raw_chars,
        }
    }

    /// Interpret a page source.
    pub fn extract(&self, source: &PageSource) -> PageSnapshot {
        // A "no data" message wins over any leftover markup.
        if self.keywords.is_not_found(&source.text) {
            return PageSnapshot::not_found();
        }

        let mut events: Vec<EventRecord> = source
            .rows
            .iter()
            .filter_map(|cells| Self::row_to_event(cells))
            .collect();

        if events.is_empty() {
            events = source
                .sections
                .iter()
                .map(|s| s.trim())
                .filter(|s| char_len(s) > MIN_SECTION_CHARS)
                .filter_map(|s| EventRecord::new([s]))
                .collect();
        }

        let found = !events.is_empty()
            || self.keywords.has_results(&source.text)
            || contains_date_stamp(&source.text);

        PageSnapshot {
            found,
            events,
            raw: truncate_chars(&source.text, self.max_raw_chars).to_string(),
        }
    }

    /// Keep cells longer than one character without embedded newlines.
    /// Rows with fewer than two surviving cells are decoration.
    fn row_to_event(cells: &[String]) -> Option<EventRecord> {
        let kept: Vec<&str> = cells
            .iter()
            .map(|c| c.trim())
            .filter(|c| char_len(c) > 1 && !c.contains('\n'))
            .collect();

        if kept.len() < 2 {
            return None;
        }
        EventRecord::new(kept)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

// src/services/classifier.rs

//! Shipment status classification.

use crate::models::{EventRecord, KeywordStrategy};

/// Status flags read from a page. Independent predicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub delivered: bool,
    pub in_customs: bool,
}

/// Classify events and raw text against the keyword strategy.
pub fn classify(keywords: &KeywordStrategy, events: &[EventRecord], raw: &str) -> StatusFlags {
    let mut corpus = events
        .iter()
        .flat_map(|record| record.fields().iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    corpus.push(' ');
    corpus.push_str(raw);

    StatusFlags {
        delivered: keywords.is_delivered(&corpus),
        in_customs: keywords.is_in_customs(&corpus),
    }
}

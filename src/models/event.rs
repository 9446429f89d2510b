//! Event records and page snapshots.

use serde::{Deserialize, Serialize};

use crate::utils::text::contains_date;

/// One row of carrier-reported tracking history.
///
/// Fields carry no fixed schema: a date, a status phrase and a location may
/// appear in any order or subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord(Vec<String>);

impl EventRecord {
    /// Build a record from its fields. Returns `None` for an empty field list.
    pub fn new<I, S>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        (!fields.is_empty()).then_some(Self(fields))
    }

    /// The record's fields in page order.
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Whether any field carries a carrier date stamp.
    pub fn is_dated(&self) -> bool {
        self.0.iter().any(|field| contains_date(field))
    }

    /// Join the fields with the given delimiter.
    pub fn join(&self, delimiter: &str) -> String {
        self.0.join(delimiter)
    }
}

/// Result of interpreting one fetched tracking page.
///
/// Produced fresh per fetch and discarded at the end of the check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Whether the page reports any tracking data at all
    pub found: bool,

    /// Extracted history rows, oldest first
    #[serde(default)]
    pub events: Vec<EventRecord>,

    /// Visible page text, truncated
    #[serde(default)]
    pub raw: String,
}

impl PageSnapshot {
    /// Snapshot for a page that reports no tracking data.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Filter records down to the dated ones, keeping their order.
pub fn dated(events: &[EventRecord]) -> impl Iterator<Item = &EventRecord> {
    events.iter().filter(|record| record.is_dated())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_rejected() {
        assert!(EventRecord::new(Vec::<String>::new()).is_none());
        assert!(EventRecord::new(["בדרך"]).is_some());
    }

    #[test]
    fn test_is_dated() {
        let dated = EventRecord::new(["01/01/2026", "בדרך"]).unwrap();
        let undated = EventRecord::new(["בדרך", "תל אביב"]).unwrap();
        assert!(dated.is_dated());
        assert!(!undated.is_dated());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let record = EventRecord::new(["02/01/2026", "נמסר"]).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"["02/01/2026","נמסר"]"#);
    }

    #[test]
    fn test_dated_keeps_order() {
        let events = vec![
            EventRecord::new(["01/01/2026", "a"]).unwrap(),
            EventRecord::new(["header", "row"]).unwrap(),
            EventRecord::new(["03/01/2026", "b"]).unwrap(),
        ];
        let joined: Vec<String> = dated(&events).map(|r| r.join("|")).collect();
        assert_eq!(joined, vec!["01/01/2026|a", "03/01/2026|b"]);
    }
}

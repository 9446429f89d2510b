// src/services/report.rs

//! Change report formatting.

use crate::models::{EventRecord, dated};
use crate::services::classifier::StatusFlags;
use crate::services::signature::display_signature;

/// Number of recent dated events quoted in a report.
const RECENT_EVENTS: usize = 3;

/// Leading marker of a report. Exactly one is chosen per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMarker {
    Delivered,
    InCustoms,
    Update,
}

impl StatusMarker {
    /// Delivered outranks customs, which outranks a plain update.
    pub fn for_flags(flags: StatusFlags) -> Self {
        if flags.delivered {
            Self::Delivered
        } else if flags.in_customs {
            Self::InCustoms
        } else {
            Self::Update
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Delivered => "✅",
            Self::InCustoms => "🛃",
            Self::Update => "📦",
        }
    }

    fn note(&self) -> Option<&'static str> {
        match self {
            Self::Delivered => Some("🎉 Package delivered!"),
            Self::InCustoms => Some("⚠️ Package is in customs, action may be required."),
            Self::Update => None,
        }
    }
}

/// Renders notification text for detected changes.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    carrier_name: String,
}

impl ReportFormatter {
    pub fn new(carrier_name: impl Into<String>) -> Self {
        Self {
            carrier_name: carrier_name.into(),
        }
    }

    /// Format the message sent when a package's signature changed.
    pub fn format_change_report(
        &self,
        id: &str,
        display_name: &str,
        signature: &str,
        events: &[EventRecord],
        flags: StatusFlags,
    ) -> String {
        let marker = StatusMarker::for_flags(flags);

        let recent: Vec<&EventRecord> = dated(events).collect();
        let start = recent.len().saturating_sub(RECENT_EVENTS);
        let body = if recent.is_empty() {
            display_signature(signature)
        } else {
            recent[start..]
                .iter()
                .map(|record| record.join(" · "))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let mut message = format!(
            "{} {} Update\n{} - {}\n\n{}",
            marker.icon(),
            self.carrier_name,
            id,
            display_name,
            body
        );
        if let Some(note) = marker.note() {
            message.push('\n');
            message.push_str(note);
        }
        message
    }
}

// src/pipeline/track.rs

//! One-off lookup of a single tracking identifier.

use crate::error::Result;
use crate::models::PageSnapshot;
use crate::services::PageFetcher;
use crate::utils::text::char_len;

/// Raw-text lines shown when the page has no structured rows.
const MAX_RAW_LINES: usize = 30;

/// Result of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    NotFound,
    Found { lines: Vec<String> },
}

/// Fetch one identifier and render its history for display.
pub async fn track(fetcher: &dyn PageFetcher, id: &str) -> Result<TrackOutcome> {
    let snapshot = fetcher.fetch(id).await?;
    Ok(render(&snapshot))
}

/// Render a snapshot as display lines: one per event row, or trimmed raw
/// text lines when no rows were extracted.
pub fn render(snapshot: &PageSnapshot) -> TrackOutcome {
    if !snapshot.found {
        return TrackOutcome::NotFound;
    }

    let lines = if snapshot.events.is_empty() {
        snapshot
            .raw
            .lines()
            .map(str::trim)
            .filter(|line| char_len(line) > 3)
            .take(MAX_RAW_LINES)
            .map(str::to_string)
            .collect()
    } else {
        snapshot
            .events
            .iter()
            .map(|record| record.join("  |  "))
            .collect()
    };

    TrackOutcome::Found { lines }
}

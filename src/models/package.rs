//! Tracked package state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked package, derived from its stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    /// Never successfully checked
    Unchecked,
    /// A signature has been observed; not delivered
    InTransit,
    /// Terminal; no further checks are performed
    Delivered,
}

/// A shipment on the watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPackage {
    /// Human-readable label
    #[serde(rename = "name")]
    pub display_name: String,

    /// When the package was added
    pub added_at: DateTime<Utc>,

    /// Last successful fetch, if any
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,

    /// Signature of the latest known event
    #[serde(default)]
    pub last_signature: Option<String>,

    /// Terminal delivered flag
    #[serde(default)]
    pub delivered: bool,
}

impl TrackedPackage {
    /// Create a never-checked package.
    pub fn new(display_name: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            display_name: display_name.into(),
            added_at,
            last_checked_at: None,
            last_signature: None,
            delivered: false,
        }
    }

    pub fn state(&self) -> PackageState {
        if self.delivered {
            PackageState::Delivered
        } else if self.last_signature.is_some() {
            PackageState::InTransit
        } else {
            PackageState::Unchecked
        }
    }
}

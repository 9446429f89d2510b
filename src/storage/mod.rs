//! Watchlist state and its persistence.
//!
//! The check cycle works on an in-memory [`Watchlist`] with explicit
//! boundaries: [`WatchlistStore::load`] once before the cycle and
//! [`WatchlistStore::commit`] once after it.
//!
//! ## File Format
//!
//! ```text
//! {
//!   "notifyChannel": "whatsapp",
//!   "notifyTarget": "+972...",
//!   "packages": {
//!     "RR123456789IL": {
//!       "name": "AliExpress order",
//!       "addedAt": "2026-01-05T10:00:00Z",
//!       "lastCheckedAt": null,
//!       "lastSignature": null,
//!       "delivered": false
//!     }
//!   }
//! }
//! ```

pub mod local;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::TrackedPackage;

// Re-export for convenience
pub use local::LocalStorage;

/// Where change notifications go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Channel name, e.g. "whatsapp" or "webhook"
    #[serde(rename = "notifyChannel", default = "default_channel")]
    pub channel: String,

    /// Recipient; `None` logs notifications instead of sending them
    #[serde(rename = "notifyTarget", default)]
    pub target: Option<String>,
}

fn default_channel() -> String {
    "whatsapp".to_string()
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            target: None,
        }
    }
}

/// All tracked packages plus notification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    #[serde(flatten)]
    pub notify: NotifySettings,

    #[serde(default)]
    packages: BTreeMap<String, TrackedPackage>,
}

impl Watchlist {
    pub fn get(&self, id: &str) -> Option<&TrackedPackage> {
        self.packages.get(id)
    }

    /// Insert or replace a package.
    pub fn upsert(&mut self, id: impl Into<String>, package: TrackedPackage) {
        self.packages.insert(id.into(), package);
    }

    /// Packages in identifier order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &TrackedPackage)> {
        self.packages.iter().map(|(id, pkg)| (id.as_str(), pkg))
    }

    /// Identifiers in check order.
    pub fn ids(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    pub fn remove(&mut self, id: &str) -> Option<TrackedPackage> {
        self.packages.remove(id)
    }

    pub fn set_target(&mut self, target: impl Into<String>, channel: impl Into<String>) {
        self.notify.target = Some(target.into());
        self.notify.channel = channel.into();
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Trait for watchlist storage backends.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Load the watchlist. A missing store yields an empty watchlist.
    async fn load(&self) -> Result<Watchlist>;

    /// Persist the whole watchlist.
    async fn commit(&self, watchlist: &Watchlist) -> Result<()>;
}

//! Change detection for tracked packages.
//!
//! Compares the signature computed from a fresh snapshot with the one
//! stored on the package. Signatures are compared byte for byte: any
//! difference, including whitespace drift, counts as a change.

use chrono::{DateTime, Utc};

use crate::models::{KeywordStrategy, PageSnapshot, TrackedPackage};
use crate::services::classifier::{StatusFlags, classify};
use crate::services::signature::build_signature;

/// Outcome of comparing a snapshot with a package's stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The page reported no tracking data
    NoData,
    /// Same signature as before
    Unchanged,
    /// First successful observation; stored without notifying
    Baseline,
    /// Signature differs from the stored one; notify
    Changed,
}

impl Transition {
    /// `NoData` and `Unchanged` are both "no transition".
    pub fn is_none(&self) -> bool {
        matches!(self, Self::NoData | Self::Unchanged)
    }

    pub fn should_notify(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Transition plus the values computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub transition: Transition,
    pub signature: String,
    pub flags: StatusFlags,
}

impl Detection {
    /// Proposed package state after a successful fetch at `checked_at`.
    ///
    /// Every successful fetch records the check time; only `Baseline` and
    /// `Changed` replace the signature and delivered flag.
    pub fn apply(&self, package: &TrackedPackage, checked_at: DateTime<Utc>) -> TrackedPackage {
        let mut next = package.clone();
        next.last_checked_at = Some(checked_at);

        if !self.transition.is_none() {
            next.last_signature = Some(self.signature.clone());
            next.delivered = self.flags.delivered;
        }
        next
    }
}

/// Classify the transition for a package given a new snapshot.
///
/// Callers must not pass packages already marked delivered.
pub fn detect_change(
    keywords: &KeywordStrategy,
    package: &TrackedPackage,
    snapshot: &PageSnapshot,
) -> Detection {
    if !snapshot.found {
        return Detection {
            transition: Transition::NoData,
            signature: String::new(),
            flags: StatusFlags::default(),
        };
    }

    let signature = build_signature(&snapshot.events, &snapshot.raw);
    let flags = classify(keywords, &snapshot.events, &snapshot.raw);

    let transition = match package.last_signature.as_deref() {
        None => Transition::Baseline,
        Some(previous) if previous == signature => Transition::Unchanged,
        Some(_) => Transition::Changed,
    };

    Detection {
        transition,
        signature,
        flags,
    }
}

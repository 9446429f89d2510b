// src/models/mod.rs

//! Domain models for the tracker application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod config;
mod event;
pub mod keywords;
mod package;

// Re-export all public types
pub use config::{Config, ExtractionConfig, NotifyConfig, TrackerConfig};
pub use event::{EventRecord, PageSnapshot, dated};
pub use keywords::{KeywordGroup, KeywordStrategy, LocaleKeywords};
pub use package::{PackageState, TrackedPackage};

//! Service layer for the tracker application.
//!
//! This module contains the business logic for:
//! - Page interpretation (`Extractor`)
//! - Signature building (`build_signature`)
//! - Status classification (`classify`)
//! - Change report rendering (`ReportFormatter`)
//! - Collaborator seams (`PageFetcher`, `Notifier`)

pub mod classifier;
pub mod extractor;
pub mod fetcher;
pub mod notifier;
pub mod report;
pub mod signature;

pub use classifier::{StatusFlags, classify};
pub use extractor::{Extractor, PageSource};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use notifier::{CommandNotifier, ConsoleNotifier, Notifier, WebhookNotifier, notifier_for};
pub use report::{ReportFormatter, StatusMarker};
pub use signature::build_signature;

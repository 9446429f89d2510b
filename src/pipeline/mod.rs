//! Pipeline entry points for tracker operations.
//!
//! - `detect_change`: Classify a fresh snapshot against stored package state
//! - `run_check`: Check every package on the watchlist and notify on changes
//! - `track`: Look up a single identifier

pub mod check;
pub mod detect;
pub mod track;

pub use check::{CheckContext, CheckSummary, Pacer, TokioPacer, run_check};
pub use detect::{Detection, Transition, detect_change};
pub use track::{TrackOutcome, track};

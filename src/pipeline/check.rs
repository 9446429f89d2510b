// src/pipeline/check.rs

//! Watchlist check cycle.
//!
//! Packages are checked one at a time with a fixed pause between fetches.
//! A failed fetch is logged and leaves that package untouched; it never
//! stops the rest of the batch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::KeywordStrategy;
use crate::pipeline::detect::{Transition, detect_change};
use crate::services::signature::display_signature;
use crate::services::{Notifier, PageFetcher, ReportFormatter};
use crate::storage::Watchlist;

/// Delay hook between package checks.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Collaborators and settings for one check cycle.
pub struct CheckContext<'a> {
    pub fetcher: &'a dyn PageFetcher,
    pub notifier: &'a dyn Notifier,
    pub pacer: &'a dyn Pacer,
    pub formatter: &'a ReportFormatter,
    pub keywords: &'a KeywordStrategy,
    pub delay: Duration,
}

/// Counts of what happened during a check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub total: usize,
    pub skipped_delivered: usize,
    pub no_data: usize,
    pub baselined: usize,
    pub unchanged: usize,
    pub changed: usize,
    pub failed: usize,
    pub notified: usize,
    pub notify_failures: usize,
}

/// Check every package on the watchlist, updating it in place.
///
/// The caller owns the load/commit boundary around this call.
pub async fn run_check(watchlist: &mut Watchlist, ctx: &CheckContext<'_>) -> CheckSummary {
    let mut summary = CheckSummary {
        total: watchlist.len(),
        ..CheckSummary::default()
    };
    let mut fetched_any = false;

    for id in watchlist.ids() {
        let Some(package) = watchlist.get(&id).cloned() else {
            continue;
        };

        if package.delivered {
            log::info!("{} ({}): already delivered, skipping", id, package.display_name);
            summary.skipped_delivered += 1;
            continue;
        }

        if fetched_any {
            ctx.pacer.pause(ctx.delay).await;
        }
        fetched_any = true;

        log::info!("Checking {} ({})...", id, package.display_name);
        let snapshot = match ctx.fetcher.fetch(&id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Error checking {}: {}", id, e);
                summary.failed += 1;
                continue;
            }
        };

        let detection = detect_change(ctx.keywords, &package, &snapshot);
        watchlist.upsert(id.as_str(), detection.apply(&package, Utc::now()));

        match detection.transition {
            Transition::NoData => {
                log::warn!(
                    "{}: no data found, may not be registered yet or the number is invalid",
                    id
                );
                summary.no_data += 1;
            }
            Transition::Unchanged => {
                log::info!("{}: no change", id);
                summary.unchanged += 1;
            }
            Transition::Baseline => {
                let latest = display_signature(&detection.signature);
                log::info!(
                    "{}: baseline saved: {}",
                    id,
                    if latest.is_empty() { "status unknown" } else { latest.as_str() }
                );
                summary.baselined += 1;
            }
            Transition::Changed => {
                summary.changed += 1;
                let message = ctx.formatter.format_change_report(
                    &id,
                    &package.display_name,
                    &detection.signature,
                    &snapshot.events,
                    detection.flags,
                );
                log::info!("{}: status changed, notifying via {}", id, ctx.notifier.name());

                match ctx.notifier.send(&message).await {
                    Ok(()) => summary.notified += 1,
                    Err(e) => {
                        log::error!("Failed to send notification for {}: {}", id, e);
                        summary.notify_failures += 1;
                    }
                }
            }
        }
    }

    log::info!(
        "Check complete: {} checked, {} changed, {} notification(s) sent, {} failed",
        summary.total - summary.skipped_delivered,
        summary.changed,
        summary.notified,
        summary.failed
    );
    summary
}

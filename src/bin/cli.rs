//! postwatch CLI
//!
//! Maintains the watchlist and runs check cycles from the command line.

use std::path::PathBuf;

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use postwatch::{
    error::{AppError, Result},
    models::{Config, PackageState, TrackedPackage},
    pipeline::{self, CheckContext, TokioPacer, TrackOutcome},
    services::{HttpFetcher, ReportFormatter, notifier_for, signature::display_signature},
    storage::{LocalStorage, WatchlistStore},
    utils::normalize_id,
};

/// postwatch - Postal Package Tracking Monitor
#[derive(Parser, Debug)]
#[command(
    name = "postwatch",
    version,
    about = "Track postal packages and get notified when their status changes"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "postwatch.toml")]
    config: PathBuf,

    /// Path to watchlist state file (default: ~/.israel-post-state.json)
    #[arg(short, long, global = true)]
    state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a package to the watchlist
    Add {
        /// Tracking number
        id: String,
        /// Display name (defaults to the tracking number)
        name: Vec<String>,
    },

    /// Remove a package from the watchlist
    #[command(visible_aliases = ["rm", "delete"])]
    Remove {
        /// Tracking number
        id: String,
    },

    /// Show all tracked packages
    #[command(visible_alias = "ls")]
    List,

    /// Check all packages and notify on changes
    #[command(visible_alias = "run")]
    Check,

    /// Set the notification target
    SetTarget {
        /// Phone number or recipient id
        target: String,
        /// Notification channel
        #[arg(default_value = "whatsapp")]
        channel: String,
    },

    /// Look up a single package and print its history
    Track {
        /// Tracking number
        id: String,
    },

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn open_storage(path: Option<PathBuf>) -> Result<LocalStorage> {
    match path {
        Some(path) => Ok(LocalStorage::new(path)),
        None => LocalStorage::in_home(),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let storage = open_storage(cli.state)?;

    match cli.command {
        Command::Add { id, name } => {
            let id = normalize_id(&id);
            if id.is_empty() {
                return Err(AppError::validation("Tracking number is empty"));
            }

            let mut watchlist = storage.load().await?;
            if let Some(existing) = watchlist.get(&id) {
                log::info!("Already tracking {} ({})", id, existing.display_name);
                return Ok(());
            }

            let name = name.join(" ");
            let name = if name.trim().is_empty() { id.clone() } else { name };
            watchlist.upsert(id.as_str(), TrackedPackage::new(name.as_str(), Utc::now()));
            storage.commit(&watchlist).await?;

            log::info!("Added: {} - \"{}\"", id, name);
            log::info!("Run 'postwatch check' to fetch initial status.");
        }

        Command::Remove { id } => {
            let id = normalize_id(&id);
            let mut watchlist = storage.load().await?;
            match watchlist.remove(&id) {
                Some(removed) => {
                    storage.commit(&watchlist).await?;
                    log::info!("Removed: {} - \"{}\"", id, removed.display_name);
                }
                None => log::info!("Not tracking {}", id),
            }
        }

        Command::List => {
            let watchlist = storage.load().await?;
            if watchlist.is_empty() {
                println!("No packages being tracked. Use: postwatch add <TRACKING_NUMBER> [name]");
                return Ok(());
            }

            println!("Tracking {} package(s):\n", watchlist.len());
            for (id, pkg) in watchlist.list() {
                let status = match pkg.state() {
                    PackageState::Delivered => "Delivered",
                    PackageState::InTransit => "In transit",
                    PackageState::Unchecked => "Not yet checked",
                };
                let checked = pkg.last_checked_at.map_or_else(
                    || "Never checked".to_string(),
                    |at| {
                        format!(
                            "Last checked: {}",
                            at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                        )
                    },
                );

                println!("  {} - \"{}\"", id, pkg.display_name);
                println!("    {} | {}", status, checked);
                if let Some(signature) = &pkg.last_signature {
                    println!("    Last event: {}", display_signature(signature));
                }
                println!();
            }
        }

        Command::Check => {
            config.validate()?;
            let mut watchlist = storage.load().await?;
            if watchlist.is_empty() {
                log::info!("No packages to check. Add one with: postwatch add <TRACKING_NUMBER> [name]");
                return Ok(());
            }

            let fetcher = HttpFetcher::new(&config)?;
            let notifier = notifier_for(&watchlist.notify, &config)?;
            let formatter = ReportFormatter::new(&config.tracker.carrier_name);
            let ctx = CheckContext {
                fetcher: &fetcher,
                notifier: notifier.as_ref(),
                pacer: &TokioPacer,
                formatter: &formatter,
                keywords: &config.keywords,
                delay: config.tracker.request_delay(),
            };

            log::info!("Checking {} package(s)...", watchlist.len());
            let summary = pipeline::run_check(&mut watchlist, &ctx).await;
            storage.commit(&watchlist).await?;

            log::info!("{} notification(s) sent.", summary.notified);
        }

        Command::SetTarget { target, channel } => {
            let target = target.trim();
            if target.is_empty() {
                return Err(AppError::validation("Notification target is empty"));
            }
            let mut watchlist = storage.load().await?;
            watchlist.set_target(target, channel.trim());
            storage.commit(&watchlist).await?;
            log::info!("Notifications will be sent to {} via {}", target, channel.trim());
        }

        Command::Track { id } => {
            let id = normalize_id(&id);
            let fetcher = HttpFetcher::new(&config)?;
            log::info!("Tracking {}...", id);

            match pipeline::track(&fetcher, &id).await? {
                TrackOutcome::NotFound => {
                    println!("No tracking information found for: {}", id);
                    println!("  - Verify the tracking number is correct");
                    println!("  - International packages may take 24-48h to appear after dispatch");
                    println!("Check manually: {}", fetcher.page_url(&id)?);
                }
                TrackOutcome::Found { lines } => {
                    println!("Tracking results for {}:\n", id);
                    for line in lines {
                        println!("  {}", line);
                    }
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} keyword locale(s))", config.keywords.locales().len());
        }
    }

    Ok(())
}

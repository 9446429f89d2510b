//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::KeywordStrategy;

/// Minimum pause between two package checks.
pub const MIN_REQUEST_DELAY_MS: u64 = 3000;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tracking page access settings
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Page extraction rules
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Notification channel settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Locale keyword sets
    #[serde(default)]
    pub keywords: KeywordStrategy,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.tracker.user_agent.trim().is_empty() {
            return Err(AppError::validation("tracker.user_agent is empty"));
        }
        if self.tracker.timeout_secs == 0 {
            return Err(AppError::validation("tracker.timeout_secs must be > 0"));
        }
        if self.tracker.request_delay_ms < MIN_REQUEST_DELAY_MS {
            return Err(AppError::validation(format!(
                "tracker.request_delay_ms must be >= {MIN_REQUEST_DELAY_MS}"
            )));
        }
        if !self.tracker.page_url.contains("{id}") {
            return Err(AppError::validation(
                "tracker.page_url must contain an {id} placeholder",
            ));
        }
        url::Url::parse(&self.tracker.page_url.replace("{id}", "ID"))?;

        for selector in [
            &self.extraction.row_selector,
            &self.extraction.cell_selector,
            &self.extraction.section_selector,
        ] {
            Selector::parse(selector).map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        }
        if self.extraction.max_raw_chars == 0 {
            return Err(AppError::validation("extraction.max_raw_chars must be > 0"));
        }

        if self.keywords.is_empty() {
            return Err(AppError::validation("No keyword locales defined"));
        }
        Ok(())
    }
}

/// Tracking page access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Carrier name used in notification headings
    #[serde(default = "defaults::carrier_name")]
    pub carrier_name: String,

    /// Tracking page URL with an `{id}` placeholder
    #[serde(default = "defaults::page_url")]
    pub page_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between package checks in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Page title fragments that indicate a bot-protection wall
    #[serde(default = "defaults::blocked_title_markers")]
    pub blocked_title_markers: Vec<String>,
}

impl TrackerConfig {
    /// Pause between package checks, never shorter than the 3 s floor.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms.max(MIN_REQUEST_DELAY_MS))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            carrier_name: defaults::carrier_name(),
            page_url: defaults::page_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            blocked_title_markers: defaults::blocked_title_markers(),
        }
    }
}

/// CSS selectors and limits used to read the tracking page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Selector for history rows
    #[serde(default = "defaults::row_selector")]
    pub row_selector: String,

    /// Selector for cells within a row
    #[serde(default = "defaults::cell_selector")]
    pub cell_selector: String,

    /// Selector for coarse result sections used when no rows qualify
    #[serde(default = "defaults::section_selector")]
    pub section_selector: String,

    /// Maximum characters of page text kept in a snapshot
    #[serde(default = "defaults::max_raw_chars")]
    pub max_raw_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            row_selector: defaults::row_selector(),
            cell_selector: defaults::cell_selector(),
            section_selector: defaults::section_selector(),
            max_raw_chars: defaults::max_raw_chars(),
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Messaging CLI invoked by the command notifier
    #[serde(default = "defaults::notify_command")]
    pub command: String,

    /// Endpoint for the webhook channel
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            command: defaults::notify_command(),
            webhook_url: None,
        }
    }
}

mod defaults {
    // Tracker defaults
    pub fn carrier_name() -> String {
        "Israel Post".into()
    }
    pub fn page_url() -> String {
        "https://mypost.israelpost.co.il/itemtrace?itemcode={id}".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        super::MIN_REQUEST_DELAY_MS
    }
    pub fn blocked_title_markers() -> Vec<String> {
        vec!["captcha".into(), "access denied".into(), "radware".into()]
    }

    // Extraction defaults
    pub fn row_selector() -> String {
        r#"table tr, .tracking-event, .trace-item, .event-row, [class*="event"], [class*="trace"]"#
            .into()
    }
    pub fn cell_selector() -> String {
        r#"td, th, .col, [class*="col"], span, div"#.into()
    }
    pub fn section_selector() -> String {
        r#".tracking-result, .item-trace-result, .result, main, article, [class*="result"]"#
            .into()
    }
    pub fn max_raw_chars() -> usize {
        3000
    }

    // Notify defaults
    pub fn notify_command() -> String {
        "openclaw".into()
    }
}

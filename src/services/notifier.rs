// src/services/notifier.rs

//! Notification channels.
//!
//! The check cycle only decides that a change happened; delivery goes
//! through a [`Notifier`]. Sends are best effort: callers log failures and
//! never let them touch package state.

use async_trait::async_trait;
use reqwest::Client;
use tokio::process::Command;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::NotifySettings;

/// Channel name that selects the webhook notifier.
pub const WEBHOOK_CHANNEL: &str = "webhook";

/// Outbound notification capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Deliver one message.
    async fn send(&self, message: &str) -> Result<()>;
}

/// Writes notifications to the log. Used when no target is configured.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, message: &str) -> Result<()> {
        log::info!("[NOTIFY] {}", message);
        Ok(())
    }
}

/// Hands messages to an external messaging CLI
/// (`<program> message send --channel .. --target .. --message ..`).
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    channel: String,
    target: String,
}

impl CommandNotifier {
    pub fn new(
        program: impl Into<String>,
        channel: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            channel: channel.into(),
            target: target.into(),
        }
    }

    /// Arguments passed to the program. No shell is involved, so the
    /// message needs no quoting.
    pub fn args<'a>(&'a self, message: &'a str) -> [&'a str; 8] {
        [
            "message",
            "send",
            "--channel",
            self.channel.as_str(),
            "--target",
            self.target.as_str(),
            "--message",
            message,
        ]
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    fn name(&self) -> &str {
        &self.channel
    }

    async fn send(&self, message: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(self.args(message))
            .status()
            .await
            .map_err(|e| AppError::notify(format!("failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(AppError::notify(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Posts messages as JSON to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    target: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            target: target.into(),
        }
    }

    pub fn payload(&self, message: &str) -> serde_json::Value {
        serde_json::json!({
            "channel": WEBHOOK_CHANNEL,
            "target": self.target,
            "text": message,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        WEBHOOK_CHANNEL
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.client
            .post(&self.url)
            .json(&self.payload(message))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(AppError::notify)?;
        Ok(())
    }
}

/// Pick the notifier for the watchlist's notification settings.
pub fn notifier_for(settings: &NotifySettings, config: &Config) -> Result<Box<dyn Notifier>> {
    let Some(target) = settings.target.as_deref() else {
        return Ok(Box::new(ConsoleNotifier));
    };

    if settings.channel == WEBHOOK_CHANNEL {
        let url = config.notify.webhook_url.as_deref().ok_or_else(|| {
            AppError::config("notify.webhook_url is required for the webhook channel")
        })?;
        let client = crate::services::fetcher::create_client(&config.tracker)?;
        return Ok(Box::new(WebhookNotifier::new(client, url, target)));
    }

    Ok(Box::new(CommandNotifier::new(
        &config.notify.command,
        &settings.channel,
        target,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(channel: &str, target: Option<&str>) -> NotifySettings {
        NotifySettings {
            channel: channel.to_string(),
            target: target.map(str::to_string),
        }
    }

    #[test]
    fn test_no_target_uses_console() {
        let notifier = notifier_for(&settings("whatsapp", None), &Config::default()).unwrap();
        assert_eq!(notifier.name(), "console");
    }

    #[test]
    fn test_target_uses_command_channel() {
        let notifier =
            notifier_for(&settings("whatsapp", Some("+972500000000")), &Config::default())
                .unwrap();
        assert_eq!(notifier.name(), "whatsapp");
    }

    #[test]
    fn test_webhook_requires_url() {
        let result = notifier_for(&settings("webhook", Some("ops")), &Config::default());
        assert!(matches!(result, Err(AppError::Config(_))));

        let mut config = Config::default();
        config.notify.webhook_url = Some("https://hooks.example.com/post".into());
        let notifier = notifier_for(&settings("webhook", Some("ops")), &config).unwrap();
        assert_eq!(notifier.name(), "webhook");
    }

    #[test]
    fn test_command_args_keep_message_verbatim() {
        let notifier = CommandNotifier::new("openclaw", "whatsapp", "+972500000000");
        let message = "📦 \"quoted\" update\nline two";
        let args = notifier.args(message);
        assert_eq!(args[3], "whatsapp");
        assert_eq!(args[5], "+972500000000");
        assert_eq!(args[7], message);
    }

    #[test]
    fn test_webhook_payload() {
        let notifier = WebhookNotifier::new(Client::new(), "https://x.test", "ops");
        let payload = notifier.payload("hello");
        assert_eq!(payload["text"], "hello");
        assert_eq!(payload["target"], "ops");
    }

    #[tokio::test]
    async fn test_console_send_succeeds() {
        assert!(ConsoleNotifier.send("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_program_is_notify_error() {
        let notifier = CommandNotifier::new("postwatch-no-such-program", "whatsapp", "x");
        let err = notifier.send("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Notify(_)));
    }
}

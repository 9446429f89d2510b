// src/error.rs

//! Unified error handling for the tracker application.

use std::fmt;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The tracking page could not be retrieved for an identifier
    #[error("Fetch failed for {id}: {message}")]
    Fetch { id: String, message: String },

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// Watchlist persistence error
    #[error("Watchlist store error: {0}")]
    Store(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a tracking identifier.
    pub fn fetch(id: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            id: id.into(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_identifier() {
        let err = AppError::fetch("RR123456789IL", "Bot protection triggered");
        assert_eq!(
            err.to_string(),
            "Fetch failed for RR123456789IL: Bot protection triggered"
        );
    }

    #[test]
    fn selector_error_formats_selector() {
        let err = AppError::selector("[[", "unexpected token");
        assert!(err.to_string().contains("'[['"));
    }

    #[test]
    fn toml_parse_error_converts() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("[tracker");
        let err = AppError::from(parse.unwrap_err());
        assert!(matches!(err, AppError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}

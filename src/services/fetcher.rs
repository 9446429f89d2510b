// src/services/fetcher.rs

//! Tracking page retrieval.
//!
//! [`PageFetcher`] is the seam between the change-detection core and
//! whatever gets the page: `HttpFetcher` for plain HTTP, or a fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, ExtractionConfig, KeywordStrategy, PageSnapshot, TrackerConfig};
use crate::services::extractor::{Extractor, PageSource};
use crate::utils::html::document_title;

/// Source of tracking page snapshots.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch and interpret the tracking page for one identifier.
    async fn fetch(&self, id: &str) -> Result<PageSnapshot>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &TrackerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetches the carrier's tracking page over HTTP.
pub struct HttpFetcher {
    client: Client,
    tracker: TrackerConfig,
    extraction: ExtractionConfig,
    keywords: KeywordStrategy,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_client(&config.tracker)?,
            tracker: config.tracker.clone(),
            extraction: config.extraction.clone(),
            keywords: config.keywords.clone(),
        })
    }

    /// Tracking page URL for an identifier.
    pub fn page_url(&self, id: &str) -> Result<Url> {
        let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        Ok(Url::parse(&self.tracker.page_url.replace("{id}", &encoded))?)
    }

    fn is_blocked(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.tracker
            .blocked_title_markers
            .iter()
            .any(|marker| title.contains(&marker.to_lowercase()))
    }

    /// Interpret a fetched page body.
    fn interpret(&self, id: &str, body: &str) -> Result<PageSnapshot> {
        let document = Html::parse_document(body);

        if let Some(title) = document_title(&document) {
            if self.is_blocked(&title) {
                return Err(AppError::fetch(
                    id,
                    format!("Bot protection triggered ({title}), try again later"),
                ));
            }
        }

        let source = PageSource::from_html(&document, &self.extraction)?;
        let extractor = Extractor::new(&self.keywords, self.extraction.max_raw_chars);
        Ok(extractor.extract(&source))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, id: &str) -> Result<PageSnapshot> {
        let url = self.page_url(id)?;
        log::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(id, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(id, format!("HTTP status {status}")));
        }

        let body = response.text().await.map_err(|e| AppError::fetch(id, e))?;
        self.interpret(id, &body)
    }
}

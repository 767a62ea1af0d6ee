use anyhow::{Context, Result};
use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Normalized record describing one retrieved article.
/// No identity or dedup guarantee: repeated searches may return duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Free-text publication date (RFC 2822 rendering, empty when absent)
    pub published: String,
    pub summary: String,
    pub source: String,
}

/// Seam for news retrieval. Infallible by contract: fetch and parse
/// failures collapse to an empty list, indistinguishable from zero matches.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Search the feed for a keyword, returning up to `max_results` items
    /// in feed order
    async fn search(&self, keyword: &str, max_results: usize) -> Vec<NewsItem>;

    /// Latest items from the unfiltered feed
    async fn latest(&self, max_results: usize) -> Vec<NewsItem>;
}

/// Google News RSS retriever
pub struct GoogleNewsSource {
    base_url: String,
    language: String,
    fetch_timeout: Duration,
    client: Client,
}

impl GoogleNewsSource {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            language: language.into(),
            fetch_timeout: Duration::from_secs(10),
            client: Client::new(),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout_secs: u64) -> Self {
        self.fetch_timeout = Duration::from_secs(timeout_secs);
        self
    }

    /// Build a retriever from the `[news]` config section
    pub fn from_config(cfg: Option<&common::NewsConfig>) -> Self {
        let base_url = cfg
            .and_then(|c| c.base_url.clone())
            .unwrap_or_else(|| "https://news.google.com/rss".to_string());
        let language = cfg
            .and_then(|c| c.language.clone())
            .unwrap_or_else(|| "en".to_string());
        let timeout_secs = cfg.and_then(|c| c.fetch_timeout_seconds).unwrap_or(10);

        Self::new(base_url, language).with_fetch_timeout(timeout_secs)
    }

    /// Search URL with the keyword and language as query parameters.
    /// `Url` handles percent-encoding, so non-ASCII keywords round-trip.
    pub fn search_url(&self, keyword: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search", self.base_url.trim_end_matches('/')))
            .context("invalid news base URL")?;
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("hl", &self.language);
        Ok(url)
    }

    async fn fetch_feed(&self, url: Url) -> Result<Vec<NewsItem>> {
        debug!("fetching feed: {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .header(reqwest::header::USER_AGENT, "Newschat/0.1.0")
            .send()
            .await
            .context("network error during fetch")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("feed fetch failed with status: {}", status);
        }

        let bytes = response.bytes().await.context("failed to read response body")?;
        let feed = parser::parse(bytes.as_ref()).context("failed to parse feed")?;
        Ok(feed.entries.iter().map(normalize_entry).collect())
    }
}

#[async_trait::async_trait]
impl NewsSource for GoogleNewsSource {
    async fn search(&self, keyword: &str, max_results: usize) -> Vec<NewsItem> {
        let url = match self.search_url(keyword) {
            Ok(url) => url,
            Err(e) => {
                warn!("could not build search URL for '{}': {:#}", keyword, e);
                return Vec::new();
            }
        };

        match self.fetch_feed(url).await {
            Ok(mut items) => {
                items.truncate(max_results);
                items
            }
            Err(e) => {
                warn!("news search for '{}' failed: {:#}", keyword, e);
                Vec::new()
            }
        }
    }

    async fn latest(&self, max_results: usize) -> Vec<NewsItem> {
        let url = match Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("invalid news base URL: {:#}", e);
                return Vec::new();
            }
        };

        match self.fetch_feed(url).await {
            Ok(mut items) => {
                items.truncate(max_results);
                items
            }
            Err(e) => {
                warn!("latest news fetch failed: {:#}", e);
                Vec::new()
            }
        }
    }
}

fn normalize_entry(entry: &Entry) -> NewsItem {
    NewsItem {
        title: entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_else(|| "No Title".to_string()),
        link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
        published: entry.published.map(|d| d.to_rfc2822()).unwrap_or_default(),
        summary: entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .unwrap_or_default(),
        source: entry
            .source
            .clone()
            .unwrap_or_else(|| "Unknown Source".to_string()),
    }
}

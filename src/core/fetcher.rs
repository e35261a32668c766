//! HTTP fetch seam
//!
//! The relay core only needs "text for a URL", so fetching sits behind a
//! trait. Production uses [`HttpFetcher`] (reqwest with the configured
//! browser headers); tests substitute in-memory implementations.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::Client;
use std::time::Duration;

use super::config::RelayConfig;

/// Supplies response text for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Fetcher backed by a shared reqwest client.
///
/// Every request carries the configured User-Agent, Referer, and Origin
/// headers and is bounded by the configured timeout. Non-2xx responses are
/// errors. No retries are attempted here.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer).context("Invalid referer header value")?,
        );
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(&config.origin).context("Invalid origin header value")?,
        );

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let response = response
            .error_for_status()
            .with_context(|| format!("Bad status from {}", url))?;

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", url))
    }
}

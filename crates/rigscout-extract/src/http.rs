//! Plain HTTP document source.
//!
//! Retrieves server-rendered markup only. Pages that need script execution
//! (Facebook in particular) should be fetched by a rendering source that
//! implements [`DocumentSource`] instead.

use crate::document::{DocumentSource, ParsedDocument};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// `reqwest`-backed [`DocumentSource`].
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: Client,
    timeout_ms: u64,
}

impl HttpDocumentSource {
    /// Create a source with the given user agent and request timeout.
    ///
    /// # Errors
    /// Returns `FetchError::Network` if the HTTP client cannot be built.
    pub fn new(user_agent: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_and_parse(&self, url: &str) -> Result<ParsedDocument> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!("unsupported scheme: {url}")));
        }

        debug!(url, "fetching listing page");

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_ms)
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "listing page returned error status");
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_ms)
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        Ok(ParsedDocument::new(final_url, html))
    }
}

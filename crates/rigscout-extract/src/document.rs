//! Document retrieval contract.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scraper::Html;

/// A fetched listing page.
///
/// Holds the raw markup rather than a parsed tree so the document can cross
/// task boundaries; call [`ParsedDocument::parse`] inside synchronous code.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Final URL after redirects
    pub url: String,
    /// Page markup
    pub html: String,
    /// When the page was retrieved
    pub fetched_at: DateTime<Utc>,
}

impl ParsedDocument {
    /// Wrap markup fetched just now.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Parse the markup into a queryable tree.
    #[must_use]
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Anything that can turn a listing URL into a document.
///
/// Implementations must be safe to call concurrently; the orchestrator runs
/// up to `concurrency` fetches at once.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch and wrap the page at `url`.
    ///
    /// # Errors
    /// Returns `FetchError` on network, HTTP or URL errors.
    async fn fetch_and_parse(&self, url: &str) -> Result<ParsedDocument>;
}

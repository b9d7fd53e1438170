pub mod detail;
pub mod heuristics;
pub mod http;
pub mod listing;
pub mod search;

use async_trait::async_trait;
use rightmove_core::{Result, RightmoveError};
use scraper::Html;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use detail::PropertyPageParser;
pub use http::{FetcherConfig, HttpFetcher};
pub use listing::SearchPageParser;
pub use search::RightmoveSearch;

/// A fetched page: its URL and raw markup.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    html: String,
}

impl Document {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parses the markup into a queryable DOM.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Retrieves documents by URL.
///
/// Implementations report transport or decoding failures by returning `None`
/// rather than an error, and must tolerate concurrent calls.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Option<Document>;
}

/// Fetches `url`, surfacing cancellation as [`RightmoveError::Cancelled`]
/// instead of a missing document.
pub(crate) async fn fetch_document(
    fetcher: &dyn DocumentFetcher,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Option<Document>> {
    if cancel.is_cancelled() {
        return Err(RightmoveError::Cancelled);
    }

    let document = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(RightmoveError::Cancelled),
        document = fetcher.fetch(url, cancel) => document,
    };

    if document.is_none() && cancel.is_cancelled() {
        return Err(RightmoveError::Cancelled);
    }

    debug!("Fetched {}: {}", url, if document.is_some() { "ok" } else { "no document" });
    Ok(document)
}

pub(crate) fn parse_selector(selector: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(selector).map_err(|e| RightmoveError::Scraping(e.to_string()))
}

use crate::{Document, DocumentFetcher};
use async_trait::async_trait;
use reqwest::Client;
use rightmove_core::{Result, RightmoveError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:69.0) Gecko/20100101 Firefox/69.0";

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// [`DocumentFetcher`] over a shared reqwest client with a cookie-less,
/// browser-like user agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Downloads an image, e.g. one of a listing's `image_urls`.
    pub async fn download_image(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let request = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok::<_, RightmoveError>(response.bytes().await?.to_vec())
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RightmoveError::Cancelled),
            bytes = request => bytes,
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Option<Document> {
        debug!("Fetching URL: {}", url);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            result = self.get_text(url) => result,
        };

        match result {
            Ok(html) => {
                debug!("Downloaded {} bytes from {}", html.len(), url);
                Some(Document::new(url, html))
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RightmoveError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to fetch document: {0}")]
    FetchFailed(String),
    #[error("Search was cancelled")]
    Cancelled,
    #[error("Scraping error: {0}")]
    Scraping(String),
    #[error("Malformed page payload: {0}")]
    Payload(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl RightmoveError {
    /// True when the error came from a cancelled search rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RightmoveError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, RightmoveError>;

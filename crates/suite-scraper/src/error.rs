//! Error types for catalog ingestion.

use std::time::Duration;

use suite_core::Retryable;

/// Result type alias for scraper operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while scraping a source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested source is not supported.
    #[error("unknown scrape source: {0}")]
    UnknownSource(String),

    /// A configured CSS selector does not parse.
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// The HTTP client could not be built or the page could not be fetched.
    #[error("fetch failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// The source answered with an error status.
    #[error("source responded with {status}")]
    Status {
        status: u16,
        retry_after: Option<Duration>,
    },

    /// Writing the batch failed.
    #[error(transparent)]
    Store(#[from] suite_store::Error),
}

impl Retryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

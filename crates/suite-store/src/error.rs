//! Error types for document store operations.

use std::borrow::Cow;

use suite_core::Retryable;

/// Result type alias for store operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum Error {
    /// Invalid or missing store configuration.
    #[error("configuration error: {0}")]
    Config(Cow<'static, str>),

    /// A collection path or document id is not addressable.
    #[error("invalid document path: {0}")]
    InvalidPath(String),

    /// The backend could not be reached.
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// A document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend answered with a payload we could not interpret.
    #[error("unexpected response: {0}")]
    Unexpected(Cow<'static, str>),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Creates a backend error from a status code and message.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates an unexpected response error.
    pub fn unexpected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unexpected(message.into())
    }
}

impl Retryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(e) => e.is_timeout() || e.is_connect(),
            Self::Backend { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_classify_by_status() {
        assert!(Error::backend(503, "unavailable").is_retryable());
        assert!(Error::backend(429, "slow down").is_retryable());
        assert!(!Error::backend(403, "denied").is_retryable());
        assert!(!Error::config("missing project id").is_retryable());
    }
}

//! Error types for publish operations.

use std::time::Duration;

use suite_core::Retryable;

use crate::PublishTarget;

/// Result type alias for publish operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while publishing to a third-party target.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The target has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(PublishTarget),

    /// The target could not be reached.
    #[error("{target} request failed: {source}")]
    Connection {
        target: PublishTarget,
        #[source]
        source: reqwest::Error,
    },

    /// The target rejected the request.
    #[error("{target} rejected the request ({status}): {message}")]
    Rejected {
        target: PublishTarget,
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },

    /// The target answered with an unreadable body.
    #[error("{target} returned an invalid response: {message}")]
    InvalidResponse {
        target: PublishTarget,
        message: String,
    },
}

impl Error {
    /// Returns the target the error relates to.
    pub fn target(&self) -> Option<PublishTarget> {
        match self {
            Self::Client(_) => None,
            Self::NotConfigured(target)
            | Self::Connection { target, .. }
            | Self::Rejected { target, .. }
            | Self::InvalidResponse { target, .. } => Some(*target),
        }
    }
}

impl Retryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection { source, .. } => source.is_timeout() || source.is_connect(),
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Rejected { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_errors_classify_by_status() {
        let rejected = |status| Error::Rejected {
            target: PublishTarget::AdsPlatform,
            status,
            message: String::new(),
            retry_after: None,
        };

        assert!(rejected(502).is_retryable());
        assert!(rejected(429).is_retryable());
        assert!(!rejected(400).is_retryable());
        assert!(!Error::NotConfigured(PublishTarget::ListingFeed).is_retryable());
        assert_eq!(rejected(400).target(), Some(PublishTarget::AdsPlatform));
    }
}

//! Errors raised while building the service state.

use std::borrow::Cow;

/// Result type alias for service construction.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building or using shared services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(Cow<'static, str>),

    /// No identity secret is configured.
    #[error("token verification is disabled")]
    AuthDisabled,

    /// A token could not be verified or signed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] suite_store::Error),

    #[error(transparent)]
    Flow(#[from] suite_rig::Error),

    #[error(transparent)]
    Scraper(#[from] suite_scraper::Error),

    #[error(transparent)]
    Publish(#[from] suite_publish::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }
}

//! Scraper configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default `User-Agent` sent with page fetches.
const DEFAULT_USER_AGENT: &str = concat!("super-seller-suite/", env!("CARGO_PKG_VERSION"));

/// Page fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ScraperConfig {
    /// Timeout in seconds for one page fetch.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SCRAPE_TIMEOUT", default_value_t = 20)
    )]
    pub scrape_timeout: u64,

    /// `User-Agent` header for page fetches.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SCRAPE_USER_AGENT", default_value = DEFAULT_USER_AGENT)
    )]
    pub scrape_user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            scrape_timeout: 20,
            scrape_user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ScraperConfig {
    /// Returns the fetch timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout)
    }
}

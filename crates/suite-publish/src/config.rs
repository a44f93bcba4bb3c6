//! Publish target configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default ads platform endpoint.
const DEFAULT_ADS_PLATFORM_URL: &str = "https://graph.facebook.com/v19.0";

/// Default listing feed endpoint.
const DEFAULT_LISTING_FEED_URL: &str = "https://api.propertyfinder.ae/v1";

/// Credentials and endpoints of the publish targets.
///
/// A target without credentials is considered unconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct PublishConfig {
    /// Access token for the ads platform.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ADS_PLATFORM_TOKEN", hide_env_values = true)
    )]
    pub ads_platform_token: Option<String>,

    /// Ad account the campaigns are created under.
    #[cfg_attr(feature = "config", arg(long, env = "ADS_PLATFORM_ACCOUNT_ID"))]
    pub ads_platform_account_id: Option<String>,

    /// Ads platform API base URL.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ADS_PLATFORM_URL", default_value = DEFAULT_ADS_PLATFORM_URL)
    )]
    pub ads_platform_url: String,

    /// API key for the listing feed.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "LISTING_FEED_API_KEY", hide_env_values = true)
    )]
    pub listing_feed_api_key: Option<String>,

    /// Listing feed API base URL.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "LISTING_FEED_URL", default_value = DEFAULT_LISTING_FEED_URL)
    )]
    pub listing_feed_url: String,

    /// Timeout in seconds for a single publish request.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "PUBLISH_TIMEOUT", default_value_t = 20)
    )]
    pub publish_timeout: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            ads_platform_token: None,
            ads_platform_account_id: None,
            ads_platform_url: DEFAULT_ADS_PLATFORM_URL.to_owned(),
            listing_feed_api_key: None,
            listing_feed_url: DEFAULT_LISTING_FEED_URL.to_owned(),
            publish_timeout: 20,
        }
    }
}

impl PublishConfig {
    /// Returns the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout)
    }
}

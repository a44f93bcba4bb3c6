//! Service configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use suite_core::RetryConfig;
use suite_publish::PublishConfig;
use suite_rig::ModelConfig;
use suite_scraper::ScraperConfig;
use suite_store::StoreConfig;

use crate::service::AuthConfig;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    #[cfg_attr(feature = "config", command(flatten))]
    pub auth: AuthConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub store: StoreConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub model: ModelConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub publish: PublishConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub scraper: ScraperConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub retry: RetryConfig,
}

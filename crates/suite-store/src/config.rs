//! Store backend selection.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::{Error, FirestoreConfig, FirestoreStore, Result, StoreClient, TRACING_TARGET_STORE};

/// Available document store backends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoreBackend {
    /// In-process store; contents are lost on restart.
    #[default]
    Memory,
    /// Google Cloud Firestore over REST.
    Firestore,
}

/// Document store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct StoreConfig {
    /// Document store backend.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::Memory)
    )]
    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Firestore project id (required by the firestore backend).
    #[cfg_attr(feature = "config", arg(long, env = "FIRESTORE_PROJECT_ID"))]
    pub firestore_project_id: Option<String>,

    /// Firestore database id.
    #[cfg_attr(feature = "config", arg(long, env = "FIRESTORE_DATABASE_ID"))]
    pub firestore_database_id: Option<String>,

    /// OAuth2 access token for Firestore.
    #[cfg_attr(feature = "config", arg(long, env = "FIRESTORE_ACCESS_TOKEN", hide_env_values = true))]
    pub firestore_access_token: Option<String>,

    /// Firestore REST endpoint override (e.g. the local emulator).
    #[cfg_attr(feature = "config", arg(long, env = "FIRESTORE_BASE_URL"))]
    pub firestore_base_url: Option<String>,
}

impl StoreConfig {
    /// Builds the configured store.
    pub fn connect(&self) -> Result<StoreClient> {
        let client = match self.store_backend {
            StoreBackend::Memory => StoreClient::memory(),
            StoreBackend::Firestore => {
                let project_id = self.firestore_project_id.as_deref().ok_or_else(|| {
                    Error::config("FIRESTORE_PROJECT_ID is required for the firestore backend")
                })?;

                let mut config = FirestoreConfig::new(project_id);
                if let Some(database_id) = &self.firestore_database_id {
                    config.database_id = database_id.clone();
                }
                if let Some(token) = &self.firestore_access_token {
                    config = config.with_access_token(token);
                }
                if let Some(base_url) = &self.firestore_base_url {
                    config = config.with_base_url(base_url);
                }

                StoreClient::new(FirestoreStore::new(config)?)
            }
        };

        tracing::info!(
            target: TRACING_TARGET_STORE,
            backend = %self.store_backend,
            "document store ready"
        );

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_is_the_default_backend() {
        let client = StoreConfig::default().connect().unwrap();
        assert_eq!(client.backend_name(), "memory");
    }

    #[test]
    fn firestore_requires_project_id() {
        let config = StoreConfig {
            store_backend: StoreBackend::Firestore,
            ..StoreConfig::default()
        };
        assert!(config.connect().is_err());
    }
}

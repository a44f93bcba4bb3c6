//! Publish targets and outcomes.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Third-party destinations for generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PublishTarget {
    /// Paid social ads platform (campaign creation).
    AdsPlatform,
    /// Partner listing portal feed.
    ListingFeed,
}

/// Final state of a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PublishStatus {
    Published,
    Failed,
    Skipped,
}

/// Structured result of a publish step, embedded in flow outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub status: PublishStatus,
    pub target: PublishTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishOutcome {
    /// The target accepted the content.
    pub fn published(target: PublishTarget, external_id: Option<String>) -> Self {
        Self {
            status: PublishStatus::Published,
            target,
            external_id,
            error: None,
        }
    }

    /// The target could not be reached or refused the content.
    pub fn failed(target: PublishTarget, error: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Failed,
            target,
            external_id: None,
            error: Some(error.into()),
        }
    }

    /// Nothing was sent.
    pub fn skipped(target: PublishTarget, reason: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Skipped,
            target,
            external_id: None,
            error: Some(reason.into()),
        }
    }

    /// Returns true if the content reached the target.
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

//! Publish request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use suite_publish::PublishTarget;

/// Body of `POST /api/publish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub target: PublishTarget,
    pub payload: Value,
}

//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness status.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    pub ok: bool,
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Application version.
    pub version: String,
    /// True when no model provider is configured.
    pub offline: bool,
    /// Number of registered tools.
    pub tools: usize,
}

impl MonitorStatus {
    pub fn new(offline: bool, tools: usize) -> Self {
        Self {
            ok: true,
            checked_at: Timestamp::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            offline,
            tools,
        }
    }
}

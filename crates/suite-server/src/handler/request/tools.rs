//! Tool run request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/run`.
///
/// The payload is forwarded untouched; the resolved flow validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTool {
    pub tool_id: String,
    #[serde(default)]
    pub payload: Value,
}

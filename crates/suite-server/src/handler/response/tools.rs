//! Tool listing response types.

use serde::Serialize;
use suite_rig::ToolDescriptor;

/// Response of `GET /api/tools`.
#[must_use]
#[derive(Debug, Serialize)]
pub struct Tools {
    pub ok: bool,
    pub tools: Vec<ToolDescriptor>,
}

impl Tools {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self { ok: true, tools }
    }
}

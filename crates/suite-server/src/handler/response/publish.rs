//! Publish response types.

use serde::Serialize;
use suite_publish::PublishOutcome;

/// Response of `POST /api/publish`.
#[must_use]
#[derive(Debug, Serialize)]
pub struct Published {
    pub ok: bool,
    pub outcome: PublishOutcome,
}

impl From<PublishOutcome> for Published {
    fn from(outcome: PublishOutcome) -> Self {
        Self { ok: true, outcome }
    }
}

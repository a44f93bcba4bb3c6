//! Catalog response types.

use serde::{Deserialize, Serialize};
use suite_scraper::ScrapeReport;
use suite_store::CatalogEntry;

/// Response of the catalog scan and suggest routes.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogEntries {
    pub ok: bool,
    pub data: Vec<CatalogEntry>,
    /// Set when nothing matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CatalogEntries {
    /// Wraps `data`, describing the empty case.
    pub fn new(data: Vec<CatalogEntry>) -> Self {
        let message = data
            .is_empty()
            .then(|| "No projects found for this market".to_owned());

        Self {
            ok: true,
            data,
            message,
        }
    }
}

/// Response of `GET /api/admin/scrape`.
#[must_use]
#[derive(Debug, Serialize)]
pub struct ScrapeResult {
    pub ok: bool,
    #[serde(flatten)]
    pub report: ScrapeReport,
}

impl From<ScrapeReport> for ScrapeResult {
    fn from(report: ScrapeReport) -> Self {
        Self { ok: true, report }
    }
}

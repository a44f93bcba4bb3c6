//! Catalog query parameters.

use serde::{Deserialize, Serialize};
use suite_core::Market;
use suite_store::CatalogQuery;

/// Query string of the catalog scan and suggest routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogParams {
    /// Maximum number of entries; each route has its own default.
    pub limit: Option<usize>,
    /// Comma-separated developer allow-list.
    pub devs: Option<String>,
}

impl CatalogParams {
    /// Splits `devs` on commas, dropping blank names.
    pub fn developers(&self) -> Vec<String> {
        self.devs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Builds the store query for `market`.
    pub fn into_query(self, market: Market, default_limit: usize) -> CatalogQuery {
        let developers = self.developers();
        CatalogQuery::new(market, self.limit.unwrap_or(default_limit)).with_developers(developers)
    }
}

/// Query string of `GET /api/admin/scrape`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeParams {
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn developers_are_trimmed_and_blank_entries_dropped() {
        let params = CatalogParams {
            limit: None,
            devs: Some(" Emaar, ,Sobha,".into()),
        };
        assert_eq!(params.developers(), ["Emaar", "Sobha"]);
        assert!(CatalogParams::default().developers().is_empty());
    }

    #[test]
    fn limit_falls_back_to_the_route_default() {
        let query = CatalogParams::default().into_query(Market::default(), 2);
        assert_eq!(query.limit, 2);

        let params = CatalogParams {
            limit: Some(7),
            devs: None,
        };
        assert_eq!(params.into_query(Market::default(), 20).limit, 7);
    }
}

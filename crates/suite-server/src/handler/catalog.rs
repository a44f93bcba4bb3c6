//! Catalog query and ingestion handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use suite_scraper::{ScrapeSource, Scraper};
use suite_store::CatalogRepository;

use crate::extract::{Json, Query, RequestMarket};
use crate::handler::request::{CatalogParams, ScrapeParams};
use crate::handler::response::{CatalogEntries, ScrapeResult};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for catalog operations.
const TRACING_TARGET: &str = "suite_server::handler::catalog";

/// Default number of entries returned by a scan.
const SCAN_LIMIT: usize = 20;
/// Default number of entries returned by a suggestion.
const SUGGEST_LIMIT: usize = 2;

async fn query_catalog(
    catalog: &CatalogRepository,
    market: RequestMarket,
    params: CatalogParams,
    default_limit: usize,
) -> Result<CatalogEntries> {
    let query = params.into_query(market.into_inner(), default_limit);
    let entries = catalog.query(&query).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        country = %query.market.country,
        city = %query.market.city,
        developers = query.developers.len(),
        limit = query.limit,
        matched = entries.len(),
        "catalog queried"
    );

    Ok(CatalogEntries::new(entries))
}

/// Returns up to `limit` (default 20) entries of the caller's market.
#[tracing::instrument(skip_all)]
async fn scan_projects(
    State(catalog): State<CatalogRepository>,
    market: RequestMarket,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogEntries>> {
    query_catalog(&catalog, market, params, SCAN_LIMIT).await.map(Json)
}

/// Same filters as the scan, with a default limit of 2.
#[tracing::instrument(skip_all)]
async fn suggest_projects(
    State(catalog): State<CatalogRepository>,
    market: RequestMarket,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogEntries>> {
    query_catalog(&catalog, market, params, SUGGEST_LIMIT).await.map(Json)
}

/// Scrapes one source into the catalog.
#[tracing::instrument(skip_all)]
async fn scrape_source(
    State(scraper): State<Scraper>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<ScrapeResult>> {
    let Some(source) = params.source.as_deref() else {
        return Err(ErrorKind::BadRequest.with_message("Missing source query parameter"));
    };

    let source = ScrapeSource::parse(source)?;
    let report = scraper.scrape(source).await?;

    tracing::info!(
        target: TRACING_TARGET,
        source = %report.source,
        projects_added = report.projects_added,
        "scrape finished"
    );

    Ok(Json(report.into()))
}

/// Returns a [`Router`] with all catalog routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/projects/scan", get(scan_projects))
        .route("/api/projects/suggest", get(suggest_projects))
        .route("/api/admin/scrape", get(scrape_source))
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use axum::http::{HeaderValue, StatusCode, header};
    use serde_json::{Value, json};
    use suite_core::Market;
    use suite_store::CatalogEntry;

    use super::*;
    use crate::handler::test::{create_test_server_with_state, create_test_state};

    async fn seed(state: &ServiceState, entries: &[CatalogEntry]) -> anyhow::Result<()> {
        CatalogRepository::from_ref(state).upsert_batch(entries).await?;
        Ok(())
    }

    #[tokio::test]
    async fn scan_respects_limit() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let dubai = Market::default();
        seed(&state, &[
            CatalogEntry::new("dxboffplan", "Creek Vista", "Sobha", &dubai),
            CatalogEntry::new("dxboffplan", "Palm Views", "Nakheel", &dubai),
        ])
        .await?;
        let server = create_test_server_with_state(routes(), state).await?;

        let response = server.get("/api/projects/scan").add_query_param("limit", 1).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn suggest_defaults_to_two() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let dubai = Market::default();
        seed(&state, &[
            CatalogEntry::new("s", "One", "Emaar", &dubai),
            CatalogEntry::new("s", "Two", "Emaar", &dubai),
            CatalogEntry::new("s", "Three", "Emaar", &dubai),
        ])
        .await?;
        let server = create_test_server_with_state(routes(), state).await?;

        let body = server.get("/api/projects/suggest").await.json::<CatalogEntries>();
        assert_eq!(body.data.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn cookies_and_developers_filter_results() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let riyadh = Market::new("SA", "Riyadh");
        seed(&state, &[
            CatalogEntry::new("s", "Dubai Hills", "Emaar", &Market::default()),
            CatalogEntry::new("s", "Roshn", "Roshn", &riyadh),
            CatalogEntry::new("s", "Jeddah Tower", "Emaar", &riyadh),
        ])
        .await?;
        let server = create_test_server_with_state(routes(), state).await?;

        let body = server
            .get("/api/projects/scan")
            .add_query_param("devs", "Emaar,Sobha")
            .add_header(header::COOKIE, HeaderValue::from_static("country=SA; city=Riyadh"))
            .await
            .json::<CatalogEntries>();

        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].name, "Jeddah Tower");
        Ok(())
    }

    #[tokio::test]
    async fn empty_market_explains_itself() -> anyhow::Result<()> {
        let server = create_test_server_with_state(routes(), create_test_state()?).await?;

        let body = server.get("/api/projects/scan").await.json::<CatalogEntries>();
        assert!(body.ok);
        assert!(body.data.is_empty());
        assert!(body.message.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn scrape_rejects_unknown_sources() -> anyhow::Result<()> {
        let server = create_test_server_with_state(routes(), create_test_state()?).await?;

        let response = server.get("/api/admin/scrape").add_query_param("source", "zillow").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server.get("/api/admin/scrape").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_limit_is_bad_request() -> anyhow::Result<()> {
        let server = create_test_server_with_state(routes(), create_test_state()?).await?;

        let response = server.get("/api/projects/scan").add_query_param("limit", "many").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}

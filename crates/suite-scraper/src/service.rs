//! Fetch, parse and ingest one source.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use suite_core::RetryPolicy;
use suite_store::CatalogRepository;

use crate::{Error, Result, ScrapeSource, ScraperConfig, TRACING_TARGET, parse_listing_page};

/// Result of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub source: ScrapeSource,
    /// Entries written in the batch.
    pub projects_added: usize,
    /// Cards rejected while parsing.
    pub skipped: usize,
}

/// Catalog ingestion service.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    catalog: CatalogRepository,
    retry: RetryPolicy,
}

impl Scraper {
    /// Creates a scraper writing into `catalog`.
    pub fn new(
        config: &ScraperConfig,
        catalog: CatalogRepository,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.scrape_user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            catalog,
            retry,
        })
    }

    /// Fetches the listing page of `source` and ingests it.
    #[tracing::instrument(skip_all, fields(source = %source))]
    pub async fn scrape(&self, source: ScrapeSource) -> Result<ScrapeReport> {
        let url = source.profile().url;
        let html = self
            .retry
            .run(source.as_ref(), || self.fetch(url))
            .await?;

        tracing::debug!(target: TRACING_TARGET, bytes = html.len(), "listing page fetched");
        self.ingest(source, &html).await
    }

    /// Parses `html` as a listing page of `source` and writes every accepted
    /// entry in one atomic batch.
    pub async fn ingest(&self, source: ScrapeSource, html: &str) -> Result<ScrapeReport> {
        let page = parse_listing_page(source, html)?;

        let projects_added = if page.entries.is_empty() {
            0
        } else {
            self.catalog.upsert_batch(&page.entries).await?
        };

        tracing::info!(
            target: TRACING_TARGET,
            source = %source,
            projects_added = projects_added,
            skipped = page.skipped,
            "catalog ingestion finished"
        );

        Ok(ScrapeReport {
            source,
            projects_added,
            skipped: page.skipped,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(Error::Status {
                status: status.as_u16(),
                retry_after,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use suite_core::Market;
    use suite_store::{CatalogQuery, StoreClient};

    use super::*;

    const PAGE: &str = r#"
        <div class="project-card">
          <h3 class="project-card__title">Creek Vista</h3>
          <span class="project-card__developer">Sobha</span>
        </div>
        <div class="project-card">
          <h3 class="project-card__title">Palm Views</h3>
          <span class="project-card__developer">Nakheel</span>
        </div>
        <div class="project-card">
          <h3 class="project-card__title"></h3>
          <span class="project-card__developer">Unknown</span>
        </div>
    "#;

    fn scraper(store: StoreClient) -> Scraper {
        Scraper::new(
            &ScraperConfig::default(),
            CatalogRepository::new(store),
            RetryPolicy::none(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ingestion_is_idempotent() -> anyhow::Result<()> {
        let store = StoreClient::memory();
        let scraper = scraper(store.clone());

        let first = scraper.ingest(ScrapeSource::Dxboffplan, PAGE).await?;
        let second = scraper.ingest(ScrapeSource::Dxboffplan, PAGE).await?;
        assert_eq!(first.projects_added, 2);
        assert_eq!(first.skipped, 1);
        assert_eq!(first, second);

        let catalog = CatalogRepository::new(store);
        let entries = catalog
            .query(&CatalogQuery::new(Market::default(), 20))
            .await?;
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["dxboffplan-creek-vista", "dxboffplan-palm-views"]);
        Ok(())
    }

    #[tokio::test]
    async fn names_with_slashes_do_not_abort_the_batch() -> anyhow::Result<()> {
        let page = r#"
            <div class="project-card">
              <h3 class="project-card__title">Creek Vista</h3>
              <span class="project-card__developer">Sobha</span>
            </div>
            <div class="project-card">
              <h3 class="project-card__title">Tower A/B</h3>
              <span class="project-card__developer">Emaar</span>
            </div>
        "#;
        let store = StoreClient::memory();

        let report = scraper(store.clone()).ingest(ScrapeSource::Dxboffplan, page).await?;
        assert_eq!(report.projects_added, 2);

        let mut ids = CatalogRepository::new(store).ids().await?;
        ids.sort();
        assert_eq!(ids, ["dxboffplan-creek-vista", "dxboffplan-tower-a-b"]);
        Ok(())
    }

    #[tokio::test]
    async fn empty_page_writes_nothing() -> anyhow::Result<()> {
        let store = StoreClient::memory();
        let report = scraper(store.clone())
            .ingest(ScrapeSource::Propertyfinder, "<html></html>")
            .await?;

        assert_eq!(report.projects_added, 0);
        assert!(CatalogRepository::new(store).ids().await?.is_empty());
        Ok(())
    }
}

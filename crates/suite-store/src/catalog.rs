//! Project catalog repository.

use std::cmp::Reverse;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use suite_core::Market;

use crate::{Document, Result, StoreClient, TRACING_TARGET_REPOSITORY};

/// Collection holding the global project catalog.
pub const CATALOG_COLLECTION: &str = "projects_catalog";

/// A scraped or curated real-estate project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// `<source>-<slug(name)>`.
    pub id: String,
    pub name: String,
    pub developer: String,
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Ingestion source tag, e.g. `dxboffplan`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl CatalogEntry {
    /// Creates an entry with the required fields and an id derived from
    /// `source` and `name`.
    pub fn new(
        source: &str,
        name: impl Into<String>,
        developer: impl Into<String>,
        market: &Market,
    ) -> Self {
        let name = name.into();
        Self {
            id: catalog_id(source, &name),
            name,
            developer: developer.into(),
            city: market.city.clone(),
            country: market.country.clone(),
            area: None,
            price_from: None,
            unit_types: None,
            handover: None,
            status: None,
            thumbnail_url: None,
            tags: None,
            source: Some(source.to_owned()),
            created_at: None,
        }
    }
}

/// Lowercases `name` and replaces every run of whitespace or `/` with a
/// single `-`, so the slug is always a valid document id segment.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '/')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Deterministic catalog id: `<source>-<slug(name)>`.
pub fn catalog_id(source: &str, name: &str) -> String {
    format!("{source}-{}", slugify(name))
}

/// Filtered read over the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    /// Market the entries must belong to.
    pub market: Market,
    /// Optional developer allow-list; empty means no developer filter.
    pub developers: Vec<String>,
    /// Maximum number of entries returned.
    pub limit: usize,
}

impl CatalogQuery {
    /// Creates a query for `market` with the given limit.
    pub fn new(market: Market, limit: usize) -> Self {
        Self {
            market,
            developers: Vec::new(),
            limit,
        }
    }

    /// Restricts results to the given developers.
    pub fn with_developers(mut self, developers: Vec<String>) -> Self {
        self.developers = developers;
        self
    }

    /// Returns true if `entry` passes the market and developer filters.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        entry.country == self.market.country
            && entry.city == self.market.city
            && (self.developers.is_empty() || self.developers.contains(&entry.developer))
    }

    /// Filters, orders and truncates `entries`.
    ///
    /// Entries carrying `createdAt` come first, newest first; the rest keep
    /// their input order.
    pub fn apply(&self, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        let mut matched: Vec<_> = entries.into_iter().filter(|e| self.matches(e)).collect();
        matched.sort_by_key(|e| Reverse(e.created_at));
        matched.truncate(self.limit);
        matched
    }
}

/// Repository over [`CATALOG_COLLECTION`].
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    store: StoreClient,
}

impl CatalogRepository {
    /// Creates a repository over `store`.
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Merge-upserts all entries in one atomic batch.
    pub async fn upsert_batch(&self, entries: &[CatalogEntry]) -> Result<usize> {
        let documents = entries
            .iter()
            .map(|entry| Document::from_serialize(entry.id.clone(), entry))
            .collect::<Result<Vec<_>>>()?;

        let written = self
            .store
            .batch_upsert_merge(CATALOG_COLLECTION, documents)
            .await?;

        tracing::info!(
            target: TRACING_TARGET_REPOSITORY,
            collection = CATALOG_COLLECTION,
            written = written,
            "catalog batch upserted"
        );

        Ok(written)
    }

    /// Runs a filtered read.
    ///
    /// Documents that do not decode as catalog entries are skipped.
    pub async fn query(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>> {
        let entries = self
            .store
            .list(CATALOG_COLLECTION)
            .await?
            .into_iter()
            .filter_map(|document| match document.deserialize::<CatalogEntry>() {
                Ok(entry) => Some(entry),
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET_REPOSITORY,
                        id = %document.id,
                        error = %error,
                        "skipping malformed catalog document"
                    );
                    None
                }
            })
            .collect();

        Ok(query.apply(entries))
    }

    /// Returns all catalog ids, in store order.
    pub async fn ids(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list(CATALOG_COLLECTION)
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect())
    }
}

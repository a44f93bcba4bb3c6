//! Document store abstraction.

use std::fmt;
use std::sync::Arc;

use derive_more::Deref;

use crate::{Document, MemoryStore, Result};

/// Narrow interface over a document database.
///
/// Collections are addressed by slash-separated paths such as
/// `projects_catalog` or `users/{uid}/projects`.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Fetches a single document.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Lists all documents of a collection.
    ///
    /// Backends that track insertion order return documents in that order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Merge-upserts a single document.
    async fn upsert_merge(&self, collection: &str, document: Document) -> Result<()>;

    /// Merge-upserts all documents atomically: either every write is
    /// visible or none is. Returns the number of documents written.
    async fn batch_upsert_merge(&self, collection: &str, documents: Vec<Document>)
    -> Result<usize>;

    /// Deletes a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Cheaply cloneable handle to a [`DocumentStore`].
#[derive(Clone, Deref)]
pub struct StoreClient(Arc<dyn DocumentStore>);

impl StoreClient {
    /// Wraps a store implementation.
    pub fn new(store: impl DocumentStore) -> Self {
        Self(Arc::new(store))
    }

    /// Creates a client backed by a fresh in-memory store.
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("backend", &self.0.backend_name())
            .finish()
    }
}

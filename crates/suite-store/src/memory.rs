//! In-process document store.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::document::{validate_collection, validate_segment};
use crate::{Document, DocumentStore, Fields, Result, TRACING_TARGET_STORE, merge_fields};

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    documents: HashMap<String, (u64, Fields)>,
}

impl Collection {
    fn upsert(&mut self, document: Document) {
        match self.documents.get_mut(&document.id) {
            Some((_, fields)) => merge_fields(fields, document.fields),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.documents.insert(document.id, (seq, document.fields));
            }
        }
    }
}

/// Document store kept in memory.
///
/// Every batch is applied while holding the write lock, so readers observe
/// either none or all of its documents. Listing returns documents in the
/// order they were first inserted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        validate_collection(collection)?;
        validate_segment(id)?;

        let collections = self.collections.read().await;
        let document = collections
            .get(collection)
            .and_then(|c| c.documents.get(id))
            .map(|(_, fields)| Document::new(id, fields.clone()));
        Ok(document)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        validate_collection(collection)?;

        let collections = self.collections.read().await;
        let Some(collection) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<_> = collection.documents.iter().collect();
        entries.sort_by_key(|(_, (seq, _))| *seq);

        Ok(entries
            .into_iter()
            .map(|(id, (_, fields))| Document::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn upsert_merge(&self, collection: &str, document: Document) -> Result<()> {
        self.batch_upsert_merge(collection, vec![document])
            .await
            .map(|_| ())
    }

    async fn batch_upsert_merge(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize> {
        validate_collection(collection)?;
        documents
            .iter()
            .try_for_each(|document| validate_segment(&document.id))?;

        let count = documents.len();
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_owned()).or_default();
        documents.into_iter().for_each(|document| target.upsert(document));

        tracing::trace!(
            target: TRACING_TARGET_STORE,
            collection = collection,
            count = count,
            "batch committed"
        );

        Ok(count)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        validate_collection(collection)?;
        validate_segment(id)?;

        let mut collections = self.collections.write().await;
        if let Some(collection) = collections.get_mut(collection) {
            collection.documents.remove(id);
        }
        Ok(())
    }
}

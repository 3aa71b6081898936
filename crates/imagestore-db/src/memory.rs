//! In-memory document store for testing and ephemeral use.
//!
//! [`InMemoryDocumentStore`] keeps documents in a `BTreeMap` behind a
//! `RwLock`. Ids come from a counter that only moves forward, matching the
//! never-reused guarantee of the SQLite backend.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use imagestore_core::{DocumentId, Error, Result};

use crate::models::Document;
use crate::store::DocumentStore;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    documents: BTreeMap<DocumentId, Document>,
}

/// An in-memory implementation of [`DocumentStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl DocumentStore for InMemoryDocumentStore {
    fn create(&self, metadata: &serde_json::Value) -> Result<DocumentId> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = DocumentId::new(inner.next_id);
        let ts = now();
        inner.documents.insert(
            id,
            Document {
                id,
                metadata: metadata.clone(),
                images: Vec::new(),
                created_at: ts.clone(),
                updated_at: ts,
            },
        );
        Ok(id)
    }

    fn replace_metadata(&self, id: DocumentId, metadata: &serde_json::Value) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.documents.get_mut(&id) {
            Some(doc) => {
                doc.metadata = metadata.clone();
                doc.updated_at = now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get(&self, id: DocumentId) -> Result<Document> {
        self.inner
            .read()
            .documents
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("document", id))
    }

    fn delete(&self, id: DocumentId) -> Result<Vec<String>> {
        self.inner
            .write()
            .documents
            .remove(&id)
            .map(|doc| doc.images)
            .ok_or_else(|| Error::not_found("document", id))
    }

    fn get_images(&self, id: DocumentId) -> Result<Vec<String>> {
        self.inner
            .read()
            .documents
            .get(&id)
            .map(|doc| doc.images.clone())
            .ok_or_else(|| Error::not_found("document", id))
    }

    fn set_images(&self, id: DocumentId, images: &[String]) -> Result<()> {
        let mut inner = self.inner.write();
        let doc = inner
            .documents
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("document", id))?;
        doc.images = images.to_vec();
        doc.updated_at = now();
        Ok(())
    }
}

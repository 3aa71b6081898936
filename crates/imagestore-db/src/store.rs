//! The [`DocumentStore`] trait and its SQLite implementation.
//!
//! The trait describes the document repository: metadata CRUD plus the
//! ordered image filename list. Absence is reported as
//! [`Error::NotFound`] for every operation except
//! [`replace_metadata`](DocumentStore::replace_metadata), which reports it as
//! `Ok(false)` so the caller decides.

use imagestore_core::{DocumentId, Error, Result};

use crate::models::Document;
use crate::pool::{get_conn, DbPool};
use crate::queries::documents;

/// Storage backend for documents.
///
/// Image-list updates are read-modify-write at the caller: nothing here
/// serialises a `get_images` followed by `set_images` on the same id.
pub trait DocumentStore: Send + Sync {
    /// Insert a document with `metadata` and an empty image list.
    fn create(&self, metadata: &serde_json::Value) -> Result<DocumentId>;

    /// Overwrite the metadata of an existing document.
    ///
    /// Returns `Ok(false)` if no document has this id.
    fn replace_metadata(&self, id: DocumentId, metadata: &serde_json::Value) -> Result<bool>;

    /// Fetch metadata and the ordered image filename list.
    fn get(&self, id: DocumentId) -> Result<Document>;

    /// Remove the document, returning the filenames it held at deletion time.
    fn delete(&self, id: DocumentId) -> Result<Vec<String>>;

    /// Fetch only the ordered image filename list.
    fn get_images(&self, id: DocumentId) -> Result<Vec<String>>;

    /// Overwrite the ordered image filename list.
    fn set_images(&self, id: DocumentId, images: &[String]) -> Result<()>;
}

/// [`DocumentStore`] over a pooled SQLite database.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: DbPool,
}

impl SqliteDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn create(&self, metadata: &serde_json::Value) -> Result<DocumentId> {
        let conn = get_conn(&self.pool)?;
        let doc = documents::create_document(&conn, metadata)?;
        tracing::debug!(document_id = %doc.id, "Document created");
        Ok(doc.id)
    }

    fn replace_metadata(&self, id: DocumentId, metadata: &serde_json::Value) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        documents::update_metadata(&conn, id, metadata)
    }

    fn get(&self, id: DocumentId) -> Result<Document> {
        let conn = get_conn(&self.pool)?;
        documents::get_document(&conn, id)?.ok_or_else(|| Error::not_found("document", id))
    }

    fn delete(&self, id: DocumentId) -> Result<Vec<String>> {
        let conn = get_conn(&self.pool)?;
        let images = documents::delete_document(&conn, id)?
            .ok_or_else(|| Error::not_found("document", id))?;
        tracing::debug!(document_id = %id, images = images.len(), "Document deleted");
        Ok(images)
    }

    fn get_images(&self, id: DocumentId) -> Result<Vec<String>> {
        let conn = get_conn(&self.pool)?;
        documents::get_images(&conn, id)?.ok_or_else(|| Error::not_found("document", id))
    }

    fn set_images(&self, id: DocumentId, images: &[String]) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        if documents::set_images(&conn, id, images)? {
            Ok(())
        } else {
            Err(Error::not_found("document", id))
        }
    }
}

//! Document CRUD operations.

use rusqlite::{Connection, OptionalExtension};
use imagestore_core::{DocumentId, Error, Result};

use crate::models::{parse_json, to_json, Document};

const COLS: &str = "id, metadata, images, created_at, updated_at";

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Insert a document with the given metadata and no images.
pub fn create_document(conn: &Connection, metadata: &serde_json::Value) -> Result<Document> {
    let metadata_json = to_json(metadata)?;
    let ts = now();

    conn.execute(
        "INSERT INTO documents (metadata, images, created_at, updated_at)
         VALUES (?1, '[]', ?2, ?2)",
        rusqlite::params![metadata_json, ts],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Document {
        id: DocumentId::new(conn.last_insert_rowid()),
        metadata: metadata.clone(),
        images: Vec::new(),
        created_at: ts.clone(),
        updated_at: ts,
    })
}

/// Get a document by ID.
pub fn get_document(conn: &Connection, id: DocumentId) -> Result<Option<Document>> {
    let q = format!("SELECT {COLS} FROM documents WHERE id = ?1");
    conn.query_row(&q, [id.get()], Document::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// Overwrite a document's metadata, leaving its images untouched.
///
/// Returns whether a row was affected.
pub fn update_metadata(
    conn: &Connection,
    id: DocumentId,
    metadata: &serde_json::Value,
) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE documents SET metadata = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![to_json(metadata)?, now(), id.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a document, returning the image filenames it held at deletion time.
pub fn delete_document(conn: &Connection, id: DocumentId) -> Result<Option<Vec<String>>> {
    conn.query_row(
        "DELETE FROM documents WHERE id = ?1 RETURNING images",
        [id.get()],
        |row| parse_json(row, 0),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Fetch only the ordered image filenames of a document.
pub fn get_images(conn: &Connection, id: DocumentId) -> Result<Option<Vec<String>>> {
    conn.query_row(
        "SELECT images FROM documents WHERE id = ?1",
        [id.get()],
        |row| parse_json(row, 0),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Overwrite the image filename list of a document.
///
/// Returns whether a row was affected.
pub fn set_images(conn: &Connection, id: DocumentId, images: &[String]) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE documents SET images = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![to_json(images)?, now(), id.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use serde_json::json;

    fn conn() -> crate::pool::PooledConnection {
        let pool = init_memory_pool().unwrap();
        pool.get().unwrap()
    }

    #[test]
    fn create_and_get() {
        let conn = conn();
        let doc = create_document(&conn, &json!({"test": "data"})).unwrap();
        assert!(doc.images.is_empty());

        let fetched = get_document(&conn, doc.id).unwrap().unwrap();
        assert_eq!(fetched.metadata, json!({"test": "data"}));
        assert!(fetched.images.is_empty());
        assert_eq!(fetched.created_at, doc.created_at);
    }

    #[test]
    fn ids_increase() {
        let conn = conn();
        let a = create_document(&conn, &json!({})).unwrap();
        let b = create_document(&conn, &json!({})).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn get_missing() {
        let conn = conn();
        assert!(get_document(&conn, DocumentId::new(999)).unwrap().is_none());
        assert!(get_images(&conn, DocumentId::new(999)).unwrap().is_none());
    }

    #[test]
    fn update_metadata_keeps_images() {
        let conn = conn();
        let doc = create_document(&conn, &json!({"a": 1})).unwrap();
        let images = vec!["img1_1.jpeg".to_string()];
        assert!(set_images(&conn, doc.id, &images).unwrap());

        assert!(update_metadata(&conn, doc.id, &json!({"b": 2})).unwrap());
        let fetched = get_document(&conn, doc.id).unwrap().unwrap();
        assert_eq!(fetched.metadata, json!({"b": 2}));
        assert_eq!(fetched.images, images);
    }

    #[test]
    fn update_metadata_missing_row() {
        let conn = conn();
        assert!(!update_metadata(&conn, DocumentId::new(23), &json!({})).unwrap());
    }

    #[test]
    fn set_and_get_images_preserves_order() {
        let conn = conn();
        let doc = create_document(&conn, &json!({})).unwrap();
        let images: Vec<String> = ["img1_1.jpeg", "img1_2.tiff", "img1_3.png"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(set_images(&conn, doc.id, &images).unwrap());
        assert_eq!(get_images(&conn, doc.id).unwrap().unwrap(), images);
        assert!(!set_images(&conn, DocumentId::new(404), &images).unwrap());
    }

    #[test]
    fn delete_returns_images() {
        let conn = conn();
        let doc = create_document(&conn, &json!({})).unwrap();
        let images = vec!["img1_1.jpeg".to_string(), "img1_2.jpeg".to_string()];
        set_images(&conn, doc.id, &images).unwrap();

        let deleted = delete_document(&conn, doc.id).unwrap().unwrap();
        assert_eq!(deleted, images);
        assert!(get_document(&conn, doc.id).unwrap().is_none());
        assert!(delete_document(&conn, doc.id).unwrap().is_none());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}

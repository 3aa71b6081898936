//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use imagestore_core::DocumentId;
use serde::de::DeserializeOwned;
use serde::Serialize;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Decode a JSON text column.
pub(crate) fn parse_json<T: DeserializeOwned>(
    row: &rusqlite::Row,
    idx: usize,
) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    serde_json::from_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Encode a value for a JSON text column.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> imagestore_core::Result<String> {
    serde_json::to_string(value)
        .map_err(|e| imagestore_core::Error::Internal(format!("JSON encode failed: {e}")))
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document row: opaque JSON metadata plus its ordered image filenames.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub metadata: serde_json::Value,
    /// Stored filenames; position + 1 is the externally visible ordinal.
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Document {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: DocumentId::new(row.get(0)?),
            metadata: parse_json(row, 1)?,
            images: parse_json(row, 2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

//! Unified error type for imagestore.
//!
//! Repository, file store and codec failures all funnel into [`Error`], which
//! carries enough context for the HTTP layer to derive a status code via
//! [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in imagestore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "document", "image").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An upload declared a content type we cannot store.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Stored image bytes could not be decoded or re-encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// No connection to the metadata store could be obtained.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A metadata store query failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A file store operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Validation(_) => 400,
            Error::UnsupportedMediaType(_) => 415,
            Error::Image(_) => 422,
            Error::StoreUnavailable(_) => 503,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::UnsupportedMediaType(_) => "unsupported_media_type",
            Error::Image(_) => "image_error",
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Whether this error means the looked-up entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

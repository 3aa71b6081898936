//! Route handlers for the HTTP API.

pub mod documents;
pub mod health;
pub mod images;

use std::num::{IntErrorKind, ParseIntError};

use imagestore_core::{DocumentId, Error};

use crate::error::AppError;

/// Parse a `{id}` path segment.
pub(crate) fn parse_document_id(raw: &str) -> Result<DocumentId, Error> {
    raw.parse()
        .map_err(|_| Error::Validation(format!("Invalid document ID: {raw}")))
}

/// Parse an `{n}` image ordinal path segment. Range checks happen later,
/// against the document's image list; a number too large for any list is
/// already out of range.
pub(crate) fn parse_ordinal(raw: &str) -> Result<i64, Error> {
    raw.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::not_found("image", raw),
        _ => Error::Validation(format!("Invalid image ordinal: {raw}")),
    })
}

/// Run store/file work off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> imagestore_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("Blocking task failed: {e}")))?
        .map_err(AppError::from)
}

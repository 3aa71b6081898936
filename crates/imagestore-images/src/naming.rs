//! On-disk filename scheme for document images.
//!
//! Files are named `img<document_id>_<ordinal>.<extension>` and live flat
//! under one storage directory. The name is derived only when a file is
//! written; reads and removals always go through the name stored in the
//! document's image list, so files that were placed out-of-band under other
//! names keep working.

use std::path::{Path, PathBuf};

use imagestore_core::{DocumentId, Error, Result};

/// Filename for the image at `ordinal` (1-based) of a document.
pub fn image_filename(document_id: DocumentId, ordinal: usize, extension: &str) -> String {
    format!("img{document_id}_{ordinal}.{extension}")
}

/// [`image_filename`] rooted under the storage directory.
pub fn image_path(
    root: &Path,
    document_id: DocumentId,
    ordinal: usize,
    extension: &str,
) -> PathBuf {
    root.join(image_filename(document_id, ordinal, extension))
}

/// Split a name produced by [`image_filename`] back into its ordinal and
/// extension, if it belongs to `document_id`.
///
/// Names that do not follow the scheme return `None`.
pub fn parse_image_filename(document_id: DocumentId, filename: &str) -> Option<(usize, &str)> {
    let prefix = format!("img{document_id}_");
    let rest = filename.strip_prefix(&prefix)?;
    let (ordinal, extension) = rest.split_once('.')?;
    if extension.is_empty() || ordinal.starts_with('0') {
        return None;
    }
    let ordinal = ordinal.parse().ok()?;
    Some((ordinal, extension))
}

/// Reject stored names that would escape the storage directory.
pub fn validate_filename(filename: &str) -> Result<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);

    if invalid {
        return Err(Error::Validation(format!(
            "invalid image filename: {filename:?}"
        )));
    }
    Ok(())
}

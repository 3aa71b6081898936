//! Image collection manager coordinating the document store and file store.
//!
//! Every mutation is a read-modify-write of the document's image list:
//! fetch the list, touch the file store, persist the new list. Within one
//! process those sequences are serialised per document id; separate
//! processes sharing a store can still interleave.
//!
//! Files written here are named by [`naming::image_filename`] with the
//! ordinal equal to the entry's position where that name is free. Removing
//! an image renames the scheme-named files behind it to their new ordinals.
//! A name that is listed by another entry or present on disk is never
//! written over.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use imagestore_core::{DocumentId, Error, Result};
use imagestore_db::DocumentStore;

use crate::codec;
use crate::naming;
use crate::storage::FileStore;

/// Bytes of one stored image, ready to serve.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedImage {
    /// Name the image is stored under.
    pub filename: String,
    /// MIME type implied by the stored name.
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// High-level image service keeping image lists and files in step.
pub struct ImageManager {
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    locks: DashMap<DocumentId, Arc<Mutex<()>>>,
}

impl ImageManager {
    /// Create a new `ImageManager`.
    ///
    /// # Arguments
    ///
    /// * `documents` - The metadata store holding each document's image list
    /// * `files` - The store holding image bytes
    pub fn new(documents: Arc<dyn DocumentStore>, files: Arc<dyn FileStore>) -> Self {
        Self {
            documents,
            files,
            locks: DashMap::new(),
        }
    }

    /// Run `f` while holding the lock for `document_id`.
    ///
    /// The table entry is dropped again once no other caller holds or waits
    /// on it, so lookups of unknown ids do not accumulate.
    fn with_lock<T>(&self, document_id: DocumentId, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self
            .locks
            .entry(document_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        drop(lock);
        self.locks
            .remove_if(&document_id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Whether `candidate` can be written for the entry at `own` without
    /// touching another entry's file or an unlisted file on disk.
    fn is_free(&self, images: &[String], own: Option<usize>, candidate: &str) -> Result<bool> {
        match images.iter().position(|name| name == candidate) {
            Some(idx) => Ok(Some(idx) == own),
            None => Ok(!self.files.exists(candidate)?),
        }
    }

    /// Name for the entry at `own` (or a new entry), preferring the scheme
    /// name for `ordinal` and otherwise the first free ordinal past the end
    /// of the list.
    fn unused_name(
        &self,
        document_id: DocumentId,
        images: &[String],
        own: Option<usize>,
        ordinal: usize,
        extension: &str,
    ) -> Result<String> {
        let mut ordinal = ordinal;
        loop {
            let candidate = naming::image_filename(document_id, ordinal, extension);
            if self.is_free(images, own, &candidate)? {
                return Ok(candidate);
            }
            ordinal = if ordinal <= images.len() {
                images.len() + 1
            } else {
                ordinal + 1
            };
        }
    }

    /// Append an image to a document.
    ///
    /// The new image takes ordinal `len + 1` and is stored under the name
    /// derived from that ordinal and the extension for `content_type`. If
    /// that name is taken, the next free ordinal is used for the name.
    ///
    /// # Returns
    ///
    /// The document's full, updated filename list.
    pub fn add(
        &self,
        document_id: DocumentId,
        content_type: &str,
        data: &[u8],
    ) -> Result<Vec<String>> {
        self.with_lock(document_id, || {
            let mut images = self.documents.get_images(document_id)?;
            let extension = codec::encode_extension(content_type)?;
            ensure_not_empty(data)?;

            let ordinal = images.len() + 1;
            let filename = self.unused_name(document_id, &images, None, ordinal, extension)?;

            self.files.write(&filename, data)?;
            images.push(filename);
            self.documents.set_images(document_id, &images)?;

            tracing::info!(document_id = %document_id, ordinal, "Image added");
            Ok(images)
        })
    }

    /// Overwrite the image at `ordinal` (1-based).
    ///
    /// Other ordinals are untouched. If the new content type changes the
    /// derived name, the previously stored file is removed.
    ///
    /// # Returns
    ///
    /// The document's full, updated filename list.
    pub fn replace(
        &self,
        document_id: DocumentId,
        ordinal: i64,
        content_type: &str,
        data: &[u8],
    ) -> Result<Vec<String>> {
        self.with_lock(document_id, || {
            let mut images = self.documents.get_images(document_id)?;
            let idx = resolve_ordinal(&images, document_id, ordinal)?;
            let extension = codec::encode_extension(content_type)?;
            ensure_not_empty(data)?;

            let filename = self.unused_name(document_id, &images, Some(idx), idx + 1, extension)?;
            self.files.write(&filename, data)?;
            let previous = std::mem::replace(&mut images[idx], filename.clone());
            self.documents.set_images(document_id, &images)?;

            if previous != filename {
                if let Err(e) = self.files.remove(&previous) {
                    tracing::warn!(
                        document_id = %document_id,
                        file = %previous,
                        "Failed to remove replaced image file: {e}"
                    );
                }
            }

            tracing::info!(document_id = %document_id, ordinal, "Image replaced");
            Ok(images)
        })
    }

    /// Remove the image at `ordinal` (1-based).
    ///
    /// Later images move down one ordinal. The stored file is deleted by its
    /// recorded name; a file that is already gone does not block removing
    /// the entry.
    pub fn remove(&self, document_id: DocumentId, ordinal: i64) -> Result<()> {
        self.with_lock(document_id, || {
            let mut images = self.documents.get_images(document_id)?;
            let idx = resolve_ordinal(&images, document_id, ordinal)?;

            let filename = images.remove(idx);
            match self.files.remove(&filename) {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    tracing::warn!(
                        document_id = %document_id,
                        file = %filename,
                        "Image file already missing; dropping list entry"
                    );
                }
                Err(e) => return Err(e),
            }

            self.realign_from(document_id, &mut images, idx);
            self.documents.set_images(document_id, &images)?;

            tracing::info!(document_id = %document_id, ordinal, "Image removed");
            Ok(())
        })
    }

    /// Rename scheme-named files at positions `start..` to match their
    /// current ordinals. Names outside the scheme are left alone, as are
    /// entries whose target name is already taken or whose rename fails.
    fn realign_from(&self, document_id: DocumentId, images: &mut [String], start: usize) {
        for idx in start..images.len() {
            let target = match naming::parse_image_filename(document_id, &images[idx]) {
                Some((ordinal, _)) if ordinal == idx + 1 => continue,
                Some((_, extension)) => naming::image_filename(document_id, idx + 1, extension),
                None => continue,
            };

            match self.is_free(images, None, &target) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(
                        document_id = %document_id,
                        file = %images[idx],
                        target = %target,
                        "Renumber target in use; keeping stored name"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        document_id = %document_id,
                        file = %target,
                        "Failed to check renumber target: {e}"
                    );
                    continue;
                }
            }

            match self.files.rename(&images[idx], &target) {
                Ok(()) => images[idx] = target,
                Err(e) => tracing::warn!(
                    document_id = %document_id,
                    file = %images[idx],
                    "Failed to renumber image file: {e}"
                ),
            }
        }
    }

    /// Read the image at `ordinal` (1-based), optionally contrast-adjusted.
    ///
    /// With `contrast` set, the bytes are decoded, adjusted and re-encoded in
    /// the format implied by the stored name. A listed file that is missing
    /// on disk is reported as not found.
    pub fn retrieve(
        &self,
        document_id: DocumentId,
        ordinal: i64,
        contrast: Option<f32>,
    ) -> Result<RetrievedImage> {
        let (filename, data) = self.with_lock(document_id, || {
            let images = self.documents.get_images(document_id)?;
            let idx = resolve_ordinal(&images, document_id, ordinal)?;
            let filename = images[idx].clone();

            let data = self.files.read(&filename).map_err(|e| {
                if e.is_not_found() {
                    tracing::warn!(
                        document_id = %document_id,
                        file = %filename,
                        "Listed image file is missing"
                    );
                    image_not_found(document_id, ordinal)
                } else {
                    e
                }
            })?;
            Ok((filename, data))
        })?;

        let data = match contrast {
            Some(level) => {
                let format = codec::format_for_filename(&filename).ok_or_else(|| {
                    Error::Image(format!("cannot determine image format of {filename}"))
                })?;
                codec::adjust_contrast(&data, level, format)?
            }
            None => data,
        };

        Ok(RetrievedImage {
            content_type: codec::mime_for_filename(&filename),
            filename,
            data,
        })
    }

    /// Delete a document row and then every image file it listed.
    ///
    /// # Returns
    ///
    /// The number of files actually removed.
    pub fn delete_document(&self, document_id: DocumentId) -> Result<usize> {
        let images = self.with_lock(document_id, || self.documents.delete(document_id))?;
        Ok(self.delete_all(document_id, &images))
    }

    /// Best-effort removal of every file in `images`.
    ///
    /// Failures are logged and do not stop the remaining deletions.
    ///
    /// # Returns
    ///
    /// The number of files actually removed.
    pub fn delete_all(&self, document_id: DocumentId, images: &[String]) -> usize {
        let mut removed = 0;
        for filename in images {
            match self.files.remove(filename) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    document_id = %document_id,
                    file = %filename,
                    "Failed to delete image file: {e}"
                ),
            }
        }
        tracing::info!(
            document_id = %document_id,
            removed,
            listed = images.len(),
            "Purged document images"
        );
        removed
    }
}

fn image_not_found(document_id: DocumentId, ordinal: i64) -> Error {
    Error::not_found("image", format!("{document_id}/{ordinal}"))
}

/// Map a 1-based ordinal to a list index; out of range is not found.
fn resolve_ordinal(images: &[String], document_id: DocumentId, ordinal: i64) -> Result<usize> {
    usize::try_from(ordinal)
        .ok()
        .filter(|&n| n >= 1 && n <= images.len())
        .map(|n| n - 1)
        .ok_or_else(|| image_not_found(document_id, ordinal))
}

fn ensure_not_empty(data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Err(Error::Validation("image body is empty".into()));
    }
    Ok(())
}

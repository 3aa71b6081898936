//! Filesystem-level image storage.
//!
//! A [`FileStore`] is a flat, byte-addressable namespace: every image is one
//! file identified by its name. [`LocalFileStore`] keeps them in a single
//! directory on disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use imagestore_core::{Error, Result};

use crate::naming::validate_filename;

/// Storage backend for image bytes.
///
/// A missing file is reported as [`Error::NotFound`] by `read`, `remove` and
/// `rename`.
pub trait FileStore: Send + Sync {
    /// Create or overwrite `name` with `data`.
    fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Read the full contents of `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Delete `name`.
    fn remove(&self, name: &str) -> Result<()>;

    /// Move `from` to `to`, replacing any existing `to`.
    fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Whether `name` currently exists.
    fn exists(&self, name: &str) -> Result<bool>;

    /// Absolute location of `name`.
    fn path(&self, name: &str) -> Result<PathBuf>;
}

/// [`FileStore`] rooted at one local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Open a store under `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The storage directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

fn map_missing(e: std::io::Error, name: &str) -> Error {
    if e.kind() == ErrorKind::NotFound {
        Error::not_found("image file", name)
    } else {
        Error::from(e)
    }
}

impl FileStore for LocalFileStore {
    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.path(name)?;
        std::fs::write(&path, data)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Wrote image file");
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path(name)?;
        std::fs::read(&path).map_err(|e| map_missing(e, name))
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name)?;
        std::fs::remove_file(&path).map_err(|e| map_missing(e, name))?;
        tracing::debug!(path = %path.display(), "Removed image file");
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let src = self.path(from)?;
        let dst = self.path(to)?;
        std::fs::rename(&src, &dst).map_err(|e| map_missing(e, from))
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path(name)?.try_exists()?)
    }

    fn path(&self, name: &str) -> Result<PathBuf> {
        validate_filename(name)?;
        Ok(self.root.join(name))
    }
}

//! Image storage and management.
//!
//! This crate keeps a document's ordered image list (held by
//! [`imagestore_db::DocumentStore`]) consistent with the files on disk
//! (held by a [`FileStore`]). It also owns the filename scheme and the
//! read-time contrast codec.

pub mod codec;
pub mod manager;
pub mod naming;
pub mod storage;

pub use manager::{ImageManager, RetrievedImage};
pub use storage::{FileStore, LocalFileStore};

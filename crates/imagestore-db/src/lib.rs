//! imagestore-db: the metadata store.
//!
//! SQLite-backed storage with connection pooling, embedded migrations and
//! typed models. The [`DocumentStore`] trait is the seam the rest of the
//! workspace talks to; [`SqliteDocumentStore`] is the production backend and
//! [`InMemoryDocumentStore`] a lock-protected map for tests.

pub mod memory;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use memory::InMemoryDocumentStore;
pub use models::Document;
pub use store::{DocumentStore, SqliteDocumentStore};

//! Application context shared by all request handlers.
//!
//! [`AppContext`] is built once at start-up from the [`Config`] and handed to
//! Axum as router state. It only holds `Arc`s, so cloning it per request is
//! cheap.

use std::sync::Arc;

use imagestore_core::config::Config;
use imagestore_core::Result;
use imagestore_db::pool::init_pool;
use imagestore_db::{DocumentStore, SqliteDocumentStore};
use imagestore_images::{FileStore, ImageManager, LocalFileStore};

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Document repository.
    pub documents: Arc<dyn DocumentStore>,
    /// Image collection manager over the same repository.
    pub images: Arc<ImageManager>,
}

impl AppContext {
    /// Assemble a context from already-constructed stores.
    pub fn new(
        config: Config,
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        let images = Arc::new(ImageManager::new(documents.clone(), files));
        Self {
            config: Arc::new(config),
            documents,
            images,
        }
    }

    /// Open the SQLite metadata store and local image directory named in
    /// `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let db_path = &config.server.db_path;
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                tracing::info!("Created database directory {}", parent.display());
            }
        }

        let existed = db_path.exists();
        let db_str = db_path.to_string_lossy();
        let pool = init_pool(&db_str)?;
        if existed {
            tracing::info!("Database opened (existing) at {db_str}");
        } else {
            tracing::info!("Database created (new) at {db_str}");
        }

        let files = LocalFileStore::new(config.storage.image_dir.clone())?;
        tracing::info!("Storing images under {}", files.root().display());

        Ok(Self::new(
            config,
            Arc::new(SqliteDocumentStore::new(pool)),
            Arc::new(files),
        ))
    }
}

//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory SQLite store, a
//! temporary image directory and a full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use imagestore_core::config::Config;
use imagestore_core::DocumentId;
use imagestore_db::pool::{init_memory_pool, DbPool};
use imagestore_db::{DocumentStore, SqliteDocumentStore};
use imagestore_images::LocalFileStore;
use imagestore_server::context::AppContext;
use imagestore_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary image directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub image_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The configured
    /// storage paths are ignored in favour of temporary ones.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let image_dir = tempfile::tempdir().expect("failed to create image dir");
        let files = LocalFileStore::new(image_dir.path()).expect("failed to open image dir");

        let ctx = AppContext::new(
            config,
            Arc::new(SqliteDocumentStore::new(db.clone())),
            Arc::new(files),
        );

        Self { ctx, db, image_dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Insert a document directly through the store.
    pub fn create_document(&self, metadata: serde_json::Value) -> DocumentId {
        self.ctx
            .documents
            .create(&metadata)
            .expect("failed to create document")
    }

    /// Filenames currently listed for a document.
    pub fn images_of(&self, id: DocumentId) -> Vec<String> {
        self.ctx
            .documents
            .get_images(id)
            .expect("failed to read image list")
    }

    /// On-disk path of a stored image file.
    pub fn image_path(&self, filename: &str) -> PathBuf {
        self.image_dir.path().join(filename)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> imagestore_db::pool::PooledConnection {
        imagestore_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }
}

/// Encode a small solid-colour image in `format`.
pub fn sample_image(format: image::ImageFormat, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 8, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgb(rgb)
        } else {
            image::Rgb([rgb[0] / 2, rgb[1] / 2, rgb[2] / 2])
        }
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .expect("failed to encode sample image");
    buf.into_inner()
}

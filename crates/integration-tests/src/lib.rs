//! Integration tests for `EcomPro`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecompro-integration-tests
//! ```
//!
//! Every test gets its own temporary data directory. Durable state goes
//! through [`FileStore`] exactly as the CLI uses it, so reopening a
//! [`TestContext`] behaves like starting a new process: the cart, accounts,
//! custom products and theme survive, the login session does not.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use tempfile::TempDir;
use tokio::net::TcpListener;

use ecompro_storefront::Store;
use ecompro_storefront::catalog::CatalogSource;
use ecompro_storefront::config::StorefrontConfig;
use ecompro_storefront::storage::{FileStore, KeyValueStore, MemoryStore};

/// Catalog used by most tests: two apparel items and one phone.
pub const SAMPLE_CATALOG: &str = r#"[
    {"id": "a", "title": "Shoe", "price": 10, "category": "Footwear", "img": ""},
    {"id": "b", "title": "Hat", "price": 5, "category": "Accessories", "img": ""},
    {"id": "m", "title": "Phone", "price": 100, "category": "Mobile", "img": ""}
]"#;

/// A temporary data directory and catalog file.
pub struct TestContext {
    dir: TempDir,
    catalog: CatalogSource,
}

impl TestContext {
    /// Create a context whose catalog file holds `catalog_json`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new(catalog_json: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("products.json");
        std::fs::write(&path, catalog_json).expect("Failed to write catalog");
        Self {
            dir,
            catalog: CatalogSource::File(path),
        }
    }

    /// Create a context with [`SAMPLE_CATALOG`].
    #[must_use]
    pub fn sample() -> Self {
        Self::new(SAMPLE_CATALOG)
    }

    /// Point the catalog at another source.
    #[must_use]
    pub fn with_catalog(mut self, catalog: CatalogSource) -> Self {
        self.catalog = catalog;
        self
    }

    /// Directory holding durable state.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Path of the stored blob for `key`.
    #[must_use]
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{key}.json"))
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration pointing at this context.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: self.data_dir(),
            catalog: self.catalog.clone(),
            ..StorefrontConfig::default()
        }
    }

    /// The durable backend, as a fresh handle.
    ///
    /// # Panics
    ///
    /// Panics if the data directory cannot be created.
    #[must_use]
    pub fn local(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::open(self.data_dir()).expect("Failed to open data dir"))
    }

    /// Open a store as a new process would: durable state from disk, an
    /// empty session, and the catalog loaded.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    pub async fn open(&self) -> Store {
        let mut store = Store::open(self.config(), self.local(), Arc::new(MemoryStore::new()))
            .expect("Failed to open store");
        store.load_catalog().await;
        store
    }
}

/// Serve `body` as a JSON response with `status` at `/products.json` on a
/// loopback port.
///
/// Returns the URL to fetch. The server runs until the runtime shuts down.
///
/// # Panics
///
/// Panics if `status` is not a valid HTTP status code or no loopback port
/// can be bound.
pub async fn serve_json(status: u16, body: &'static str) -> String {
    let status = StatusCode::from_u16(status).expect("Invalid status code");
    let router = Router::new().route(
        "/products.json",
        get(move || async move { (status, [(CONTENT_TYPE, "application/json")], body) }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    format!("http://{addr}/products.json")
}

//! Product catalog loading.
//!
//! The catalog combines two sources:
//! - a static JSON document (an array of products), fetched once at startup
//!   from a URL or read from a file
//! - custom products created through the product adder, kept in local storage
//!
//! Loading never fails: if the static document cannot be fetched or parsed the
//! failure is logged and the catalog falls back to the custom products alone.
//!
//! Entries are merged static-first. When two entries share an id the later one
//! wins and takes the earlier one's position.

pub mod filter;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::instrument;
use url::Url;

use ecompro_core::Product;

use crate::storage::products::decode_products;

pub use filter::{CategoryFilter, FilterOptions, SortKey, apply_filters};

/// Errors fetching or decoding the static catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading the catalog file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document is JSON but not an array of products.
    #[error("catalog document must be a JSON array")]
    NotAnArray,
}

/// Where the static catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched over HTTP(S).
    Url(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a configuration string as a catalog source.
    ///
    /// `http://` and `https://` URLs are fetched, `file://` URLs and anything
    /// that is not a URL are treated as filesystem paths.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_or_else(|()| Self::File(PathBuf::from(s)), Self::File),
            _ => Self::File(PathBuf::from(s)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The merged product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Merge static and custom products, static first, last write wins by id.
    #[must_use]
    pub fn merge(static_products: Vec<Product>, custom: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        for product in static_products.into_iter().chain(custom) {
            catalog.push(product);
        }
        catalog
    }

    /// Add a product. An existing product with the same id is replaced in
    /// place; returns `true` when that happens.
    pub fn push(&mut self, product: Product) -> bool {
        if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
            tracing::warn!(id = %product.id, "Duplicate product id, keeping the later entry");
            *existing = product;
            return true;
        }
        self.products.push(product);
        false
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    /// The first `count` products, as shown on the home page.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Product] {
        let (head, _) = self.products.split_at(count.min(self.products.len()));
        head
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(product.category.as_str());
            }
        }
        seen
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// One-shot loader for the static catalog document.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Create a loader for `source`.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch and decode the static catalog document.
    ///
    /// Malformed entries inside a well-formed array are skipped, not fatal.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the document cannot be fetched, is not JSON,
    /// or is not an array.
    pub async fn fetch_static(&self) -> Result<Vec<Product>, CatalogError> {
        let document: serde_json::Value = match &self.source {
            CatalogSource::Url(url) => {
                self.client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?
            }
            CatalogSource::File(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?;
                serde_json::from_str(&raw)?
            }
        };

        let serde_json::Value::Array(records) = document else {
            return Err(CatalogError::NotAnArray);
        };

        Ok(decode_products(&self.source.to_string(), records))
    }

    /// Load the full catalog: static document merged with `custom`.
    ///
    /// Never fails; a static fetch failure degrades to `custom` alone.
    #[instrument(skip(self, custom), fields(source = %self.source))]
    pub async fn load(&self, custom: Vec<Product>) -> Catalog {
        let static_products = match self.fetch_static().await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load catalog document, using custom products only");
                Vec::new()
            }
        };

        let static_count = static_products.len();
        let custom_count = custom.len();
        let catalog = Catalog::merge(static_products, custom);
        tracing::info!(
            static_count,
            custom_count,
            total = catalog.len(),
            "Catalog loaded"
        );
        catalog
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecompro_core::{Price, ProductId};

    use super::*;

    fn product(id: &str, title: &str, category: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_owned(),
            price: Price::from_units(price),
            category: category.to_owned(),
            img: String::new(),
        }
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            CatalogSource::parse("https://shop.example/data/products.json"),
            CatalogSource::Url(_)
        ));
        assert_eq!(
            CatalogSource::parse("data/products.json"),
            CatalogSource::File(PathBuf::from("data/products.json"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_source_parse_file_url() {
        assert_eq!(
            CatalogSource::parse("file:///srv/products.json"),
            CatalogSource::File(PathBuf::from("/srv/products.json"))
        );
    }

    #[test]
    fn test_merge_static_first() {
        let catalog = Catalog::merge(
            vec![product("a", "Shoe", "Apparel", 10)],
            vec![product("cust-1", "Mug", "Home", 3)],
        );
        let ids: Vec<_> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "cust-1"]);
    }

    #[test]
    fn test_merge_last_write_wins_in_place() {
        let catalog = Catalog::merge(
            vec![
                product("a", "Shoe", "Apparel", 10),
                product("b", "Hat", "Apparel", 5),
            ],
            vec![product("a", "Better Shoe", "Apparel", 12)],
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[0].title, "Better Shoe");
        assert_eq!(catalog.find("a").unwrap().price, Price::from_units(12));
    }

    #[test]
    fn test_featured_and_categories() {
        let catalog = Catalog::merge(
            vec![
                product("a", "Shoe", "Apparel", 10),
                product("b", "Phone", "Mobile", 500),
                product("c", "Hat", "Apparel", 5),
            ],
            Vec::new(),
        );
        assert_eq!(catalog.featured(2).len(), 2);
        assert_eq!(catalog.featured(10).len(), 3);
        assert_eq!(catalog.categories(), ["Apparel", "Mobile"]);
    }

    #[tokio::test]
    async fn test_fetch_static_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "a", "title": "Shoe", "price": 10, "category": "Apparel", "img": "a.png"},
                {"id": "b", "title": "Hat", "price": "5", "category": "Apparel"},
                {"id": "c", "price": 1},
                {"id": "d", "title": "Yacht", "price": 1e28, "category": "Leisure"}
            ]"#,
        )
        .unwrap();

        let products = CatalogLoader::new(CatalogSource::File(path))
            .fetch_static()
            .await
            .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, Price::from_units(5));
    }

    #[tokio::test]
    async fn test_fetch_static_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, r#"{"products": []}"#).unwrap();

        let result = CatalogLoader::new(CatalogSource::File(path))
            .fetch_static()
            .await;
        assert!(matches!(result, Err(CatalogError::NotAnArray)));
    }

    #[tokio::test]
    async fn test_load_falls_back_to_custom_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(CatalogSource::File(dir.path().join("missing.json")));

        let catalog = loader
            .load(vec![product("cust-1", "Mug", "Home", 3)])
            .await;
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("cust-1").is_some());
    }

    #[tokio::test]
    async fn test_load_falls_back_on_unreachable_url() {
        // Nothing on the discard port serves a product array.
        let loader = CatalogLoader::new(CatalogSource::parse("http://127.0.0.1:9/products.json"));
        assert!(loader.load(Vec::new()).await.is_empty());
    }
}

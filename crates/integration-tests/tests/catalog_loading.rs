//! Catalog loading from files and HTTP, merged with custom products.

use ecompro_core::{NewProduct, Price};
use ecompro_integration_tests::{SAMPLE_CATALOG, TestContext, serve_json};
use ecompro_storefront::catalog::{CatalogSource, FilterOptions, SortKey};

fn new_product(title: &str, price: &str) -> NewProduct {
    NewProduct {
        title: title.to_owned(),
        price: price.to_owned(),
        category: "Apparel".to_owned(),
        img: None,
    }
}

#[tokio::test]
async fn test_loads_catalog_file() {
    let ctx = TestContext::sample();
    let store = ctx.open().await;
    assert_eq!(store.catalog().len(), 3);
    assert_eq!(store.featured(2).len(), 2);
    assert_eq!(store.categories(), ["Footwear", "Accessories"]);
}

#[tokio::test]
async fn test_skips_malformed_entries() {
    let ctx = TestContext::new(
        r#"[
            {"id": 1, "title": "Tee", "price": "499", "category": "Apparel"},
            {"id": "2", "title": "", "price": 10, "category": "Apparel"},
            {"id": "3", "title": "Belt", "price": -1, "category": "Accessories"},
            "nonsense",
            {"id": "4", "title": "Cap", "price": 299.5, "category": "Accessories"}
        ]"#,
    );
    let store = ctx.open().await;
    let ids: Vec<&str> = store
        .catalog()
        .products()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, ["1", "4"]);
    assert_eq!(
        store.catalog().find("1").expect("tee").price,
        Price::from_units(499)
    );
}

#[tokio::test]
async fn test_missing_catalog_falls_back_to_custom_products() {
    let ctx = TestContext::sample();
    let mut store = ctx.open().await;
    store.login("admin", "password").expect("admin login");
    let added = store
        .add_custom_product(new_product("Linen Shirt", "1499"))
        .expect("add product");
    drop(store);

    std::fs::remove_file(ctx.root().join("products.json")).expect("remove catalog");

    let store = ctx.open().await;
    assert_eq!(store.catalog().len(), 1);
    assert_eq!(store.catalog().find(added.id.as_str()), Some(&added));
}

#[tokio::test]
async fn test_not_an_array_falls_back() {
    let ctx = TestContext::new(r#"{"products": []}"#);
    let store = ctx.open().await;
    assert!(store.catalog().is_empty());
}

#[tokio::test]
async fn test_custom_products_follow_static_ones() {
    let ctx = TestContext::sample();
    let mut store = ctx.open().await;
    store.login("admin", "password").expect("admin login");
    store
        .add_custom_product(new_product("Linen Shirt", "1499"))
        .expect("add product");
    drop(store);

    let store = ctx.open().await;
    let titles: Vec<&str> = store
        .catalog()
        .products()
        .iter()
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(titles, ["Shoe", "Hat", "Phone", "Linen Shirt"]);

    let cheapest_first = store.apply_filters(&FilterOptions {
        sort: SortKey::PriceAsc,
        ..store.default_filters()
    });
    let titles: Vec<&str> = cheapest_first.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Hat", "Shoe", "Linen Shirt"]);
}

#[tokio::test]
async fn test_loads_catalog_over_http() {
    let url = serve_json(200, SAMPLE_CATALOG).await;
    let ctx = TestContext::sample().with_catalog(CatalogSource::parse(&url));
    assert!(matches!(ctx.config().catalog, CatalogSource::Url(_)));

    let store = ctx.open().await;
    assert_eq!(store.catalog().len(), 3);
}

#[tokio::test]
async fn test_http_error_status_falls_back() {
    let url = serve_json(500, r#"{"error": "boom"}"#).await;
    let ctx = TestContext::sample().with_catalog(CatalogSource::parse(&url));

    let store = ctx.open().await;
    assert!(store.catalog().is_empty());
}

#[tokio::test]
async fn test_http_missing_document_falls_back() {
    let url = serve_json(200, SAMPLE_CATALOG).await;
    let missing = url.replace("products.json", "missing.json");
    let ctx = TestContext::sample().with_catalog(CatalogSource::parse(&missing));

    let store = ctx.open().await;
    assert!(store.catalog().is_empty());
}

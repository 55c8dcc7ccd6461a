//! Checkout and preferences.

use ecompro_core::{Price, Theme};
use ecompro_integration_tests::TestContext;
use ecompro_storefront::services::CheckoutError;
use ecompro_storefront::storage::keys;
use ecompro_storefront::{Command, Outcome, StoreError, StoreEvent};

#[tokio::test]
async fn test_checkout_empties_persisted_cart() {
    let ctx = TestContext::sample();
    let mut store = ctx.open().await;
    store.add_to_cart("a", 2).expect("add a");
    store.add_to_cart("b", 1).expect("add b");

    let mut events = store.subscribe();
    let order = store.checkout().expect("checkout");
    assert_eq!(order.total, Price::from_units(25));
    assert_eq!(order.item_count(), 3);
    assert_eq!(order.lines.len(), 2);

    assert!(matches!(
        events.recv().await.expect("event"),
        StoreEvent::CartChanged { item_count: 0, .. }
    ));
    assert!(matches!(
        events.recv().await.expect("event"),
        StoreEvent::OrderPlaced(ref placed) if placed == &order
    ));
    drop(store);

    let mut store = ctx.open().await;
    assert!(store.cart().is_empty());
    assert!(matches!(
        store.checkout(),
        Err(StoreError::Checkout(CheckoutError::EmptyCart))
    ));
}

#[tokio::test]
async fn test_theme_is_stored_as_bare_string() {
    let ctx = TestContext::sample();
    let mut store = ctx.open().await;
    assert_eq!(store.toggle_theme().expect("toggle"), Theme::Dark);
    drop(store);

    let raw = std::fs::read_to_string(ctx.blob_path(keys::THEME)).expect("theme blob");
    assert_eq!(raw, "dark");
    assert_eq!(ctx.open().await.theme().expect("theme"), Theme::Dark);
}

#[tokio::test]
async fn test_dispatch_round() {
    let ctx = TestContext::sample();
    let mut store = ctx.open().await;

    let outcome = store
        .dispatch(Command::AddToCart {
            id: "m".to_owned(),
            qty: 1,
        })
        .await
        .expect("add");
    assert!(matches!(outcome, Outcome::Cart(ref cart) if cart.total == Price::from_units(100)));

    let outcome = store.dispatch(Command::Categories).await.expect("categories");
    assert_eq!(
        outcome,
        Outcome::Categories(vec!["Footwear".to_owned(), "Accessories".to_owned()])
    );

    let outcome = store.dispatch(Command::LoadCatalog).await.expect("reload");
    assert_eq!(outcome, Outcome::CatalogLoaded { count: 3 });

    let outcome = store
        .dispatch(Command::UpdateQty {
            id: "m".to_owned(),
            qty: -1,
        })
        .await
        .expect("remove by quantity");
    assert!(matches!(outcome, Outcome::Cart(ref cart) if cart.items.is_empty()));
    assert!(store.cart().is_empty());
}

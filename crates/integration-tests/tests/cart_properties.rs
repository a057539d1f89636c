//! Cart manager behaviour over whole operation sequences.

#![allow(clippy::unwrap_used)]

use eliteshop_core::{Cart, ProductId};
use eliteshop_integration_tests::{EventLog, catalog_product, memory_storefront};
use eliteshop_storefront::StoreEvent;
use eliteshop_storefront::events::CartAction;
use eliteshop_storefront::services::cart::CartManager;
use eliteshop_storefront::store::{KeyValueStore, keys};

fn published_cart(event: &StoreEvent) -> &Cart {
    match event {
        StoreEvent::CartUpdated(e) => &e.cart,
        StoreEvent::UserStateChanged(_) => panic!("expected a cart event"),
    }
}

#[tokio::test]
async fn test_repeated_adds_sum_quantities() {
    let (storefront, _) = memory_storefront();
    let headphones = catalog_product(&storefront, "1").await;

    for quantity in [1, 4, 2, 7] {
        storefront
            .cart()
            .add_to_cart(headphones.clone(), quantity)
            .await
            .unwrap();
    }

    let cart = storefront.cart().get_cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.entry(&headphones.id).unwrap().quantity, 14);
}

#[tokio::test]
async fn test_non_positive_update_matches_remove() {
    let (a, _) = memory_storefront();
    let (b, _) = memory_storefront();
    for storefront in [&a, &b] {
        let tea = catalog_product(storefront, "4").await;
        let lens = catalog_product(storefront, "5").await;
        storefront.cart().add_to_cart(tea, 2).await.unwrap();
        storefront.cart().add_to_cart(lens, 1).await.unwrap();
    }

    let id = ProductId::new("4");
    let updated = a.cart().update_quantity(&id, 0).await.unwrap();
    let removed = b.cart().remove_from_cart(&id).await.unwrap();

    assert_eq!(updated, removed);
    assert!(updated.entry(&id).is_none());
}

#[tokio::test]
async fn test_totals_are_pure() {
    let (storefront, store) = memory_storefront();
    let backpack = catalog_product(&storefront, "3").await;
    let cart = storefront.cart().add_to_cart(backpack, 3).await.unwrap();
    let log = EventLog::attach(&storefront);
    let raw_before = store.get(keys::CART).unwrap();

    let first = (CartManager::cart_total(&cart), CartManager::cart_count(&cart));
    let second = (CartManager::cart_total(&cart), CartManager::cart_count(&cart));

    assert_eq!(first, second);
    assert_eq!(first.1, 3);
    assert_eq!(first.0.to_string(), "$269.97");
    assert!(log.is_empty());
    assert_eq!(store.get(keys::CART).unwrap(), raw_before);
}

#[tokio::test]
async fn test_clear_removes_record() {
    let (storefront, store) = memory_storefront();
    let watch = catalog_product(&storefront, "2").await;
    storefront.cart().add_to_cart(watch, 1).await.unwrap();

    storefront.cart().clear_cart().await.unwrap();

    assert!(storefront.cart().get_cart().is_empty());
    assert_eq!(store.get(keys::CART).unwrap(), None);
}

#[tokio::test]
async fn test_persisted_cart_reloads_equal() {
    let (storefront, store) = memory_storefront();
    let skincare = catalog_product(&storefront, "6").await;
    let tea = catalog_product(&storefront, "4").await;

    storefront.cart().add_to_cart(skincare, 2).await.unwrap();
    storefront.cart().add_to_cart(tea.clone(), 1).await.unwrap();
    let in_memory = storefront
        .cart()
        .update_quantity(&tea.id, 5)
        .await
        .unwrap();

    // A second storefront over the same origin reads the same record
    let reloaded = eliteshop_integration_tests::storefront_over(store.clone())
        .cart()
        .get_cart();
    assert_eq!(reloaded, in_memory);

    // Original price survives the trip
    assert!(reloaded.entries()[0].product.original_price.is_some());
}

#[tokio::test]
async fn test_each_mutation_publishes_getter_snapshot() {
    let (storefront, _) = memory_storefront();
    let log = EventLog::attach(&storefront);
    let cart = storefront.cart();
    let lens = catalog_product(&storefront, "5").await;
    let backpack = catalog_product(&storefront, "3").await;

    cart.add_to_cart(lens.clone(), 1).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(published_cart(&log.last().unwrap()), &cart.get_cart());

    cart.add_to_cart(backpack.clone(), 2).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(published_cart(&log.last().unwrap()), &cart.get_cart());

    cart.update_quantity(&backpack.id, 4).await.unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(published_cart(&log.last().unwrap()), &cart.get_cart());

    cart.remove_from_cart(&lens.id).await.unwrap();
    assert_eq!(log.len(), 4);
    assert_eq!(published_cart(&log.last().unwrap()), &cart.get_cart());

    cart.clear_cart().await.unwrap();
    assert_eq!(log.len(), 5);
    assert_eq!(published_cart(&log.last().unwrap()), &cart.get_cart());

    let actions: Vec<&'static str> = log
        .events()
        .iter()
        .map(|e| match e {
            StoreEvent::CartUpdated(e) => match e.action {
                CartAction::Add { .. } => "add",
                CartAction::Remove { .. } => "remove",
                CartAction::Update { .. } => "update",
                CartAction::Clear => "clear",
                CartAction::Sync => "sync",
            },
            StoreEvent::UserStateChanged(_) => "user",
        })
        .collect();
    assert_eq!(actions, ["add", "add", "update", "remove", "clear"]);
}

#[tokio::test]
async fn test_event_payload_serializes_like_a_dom_event() {
    let (storefront, _) = memory_storefront();
    let log = EventLog::attach(&storefront);
    let tea = catalog_product(&storefront, "4").await;
    storefront.cart().add_to_cart(tea, 2).await.unwrap();

    let value = serde_json::to_value(log.last().unwrap()).unwrap();
    assert_eq!(value["event"], "cart-updated");
    assert_eq!(value["detail"]["action"], "add");
    assert_eq!(value["detail"]["quantity"], 2);
    assert_eq!(value["detail"]["product"]["id"], "4");
    assert_eq!(value["detail"]["cart"][0]["quantity"], 2);
    assert_eq!(value["detail"]["cart"][0]["product"]["price"], "34.99");
}

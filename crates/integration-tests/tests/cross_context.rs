//! Changes made through one context seen by another.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use eliteshop_integration_tests::{EventLog, catalog_product, storefront_over, test_config};
use eliteshop_storefront::events::{CartAction, SessionAction};
use eliteshop_storefront::services::cart::CartError;
use eliteshop_storefront::store::{FileStore, KeyValueStore, MemoryStore, StoreError, keys};
use eliteshop_storefront::{StoreEvent, Storefront};

#[tokio::test]
async fn test_memory_contexts_share_state_and_sync() {
    let tab_a = Arc::new(MemoryStore::new());
    let tab_b = Arc::new(tab_a.open_context());
    let a = storefront_over(tab_a);
    let b = storefront_over(tab_b);
    let log_a = EventLog::attach(&a);
    let log_b = EventLog::attach(&b);

    let jane = a
        .session()
        .login("jane@example.com", "password123")
        .await
        .unwrap();
    let headphones = catalog_product(&a, "1").await;
    a.cart().add_to_cart(headphones, 1).await.unwrap();

    // Own context: the real actions
    assert_eq!(log_a.len(), 2);

    // Other context: the same changes, as sync
    let events = log_b.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        StoreEvent::UserStateChanged(e) => {
            assert_eq!(e.action, SessionAction::Sync);
            assert_eq!(e.user.as_ref(), Some(&jane));
            assert_eq!(e.previous_user, None);
        }
        other => panic!("unexpected {other:?}"),
    }
    match &events[1] {
        StoreEvent::CartUpdated(e) => {
            assert_eq!(e.action, CartAction::Sync);
            assert_eq!(e.cart, b.cart().get_cart());
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(b.session().current_session(), Some(jane));
}

#[tokio::test]
async fn test_file_stores_sync_on_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let file_a = Arc::new(FileStore::open(&path).unwrap());
    let file_b = Arc::new(FileStore::open(&path).unwrap());
    let a = storefront_over(file_a.clone());
    let b = storefront_over(file_b.clone());
    let log_b = EventLog::attach(&b);

    let tea = catalog_product(&a, "4").await;
    a.cart().add_to_cart(tea, 3).await.unwrap();

    // Reads go to disk, notifications wait for a refresh
    assert_eq!(b.cart().get_cart().item_count(), 3);
    assert!(log_b.is_empty());

    let changes = file_b.refresh().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].key, keys::CART);
    match log_b.last().unwrap() {
        StoreEvent::CartUpdated(e) => {
            assert_eq!(e.action, CartAction::Sync);
            assert_eq!(e.cart.item_count(), 3);
        }
        other => panic!("unexpected {other:?}"),
    }

    // Nothing new on a second refresh; own writes never come back
    assert!(file_b.refresh().unwrap().is_empty());
    assert!(file_a.refresh().unwrap().is_empty());
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let storefront = storefront_over(store);
        storefront
            .session()
            .login("admin@eliteshop.com", "admin123")
            .await
            .unwrap();
        let lens = catalog_product(&storefront, "5").await;
        storefront.cart().add_to_cart(lens, 1).await.unwrap();
    }

    let (storefront, _) = Storefront::open(eliteshop_storefront::config::StorefrontConfig {
        data_file: path,
        ..test_config()
    })
    .unwrap();
    assert_eq!(
        storefront.session().current_session().unwrap().name,
        "Admin User"
    );
    assert_eq!(storefront.cart().get_cart().item_count(), 1);
}

#[tokio::test]
async fn test_quota_exceeded_write_publishes_nothing() {
    let store = Arc::new(MemoryStore::with_quota(256));
    let other = Arc::new(store.open_context());
    let storefront = storefront_over(store.clone());
    let watcher = storefront_over(other);
    let log = EventLog::attach(&storefront);
    let log_other = EventLog::attach(&watcher);

    let headphones = catalog_product(&storefront, "1").await;
    let err = storefront
        .cart()
        .add_to_cart(headphones, 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::Store(StoreError::QuotaExceeded { limit: 256, .. })
    ));
    assert!(log.is_empty());
    assert!(log_other.is_empty());
    assert_eq!(store.get(keys::CART).unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_records_degrade_to_defaults() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::CART, "{\"not\":\"a cart\"}").unwrap();
    store.set(keys::CURRENT_USER, "[]").unwrap();
    store.set(keys::USERS_DB, "garbage").unwrap();
    let storefront = storefront_over(store.clone());

    assert!(storefront.cart().get_cart().is_empty());
    assert!(!storefront.session().is_authenticated());
    assert!(storefront.session().registered_users().unwrap().is_empty());

    // Writing over a corrupt cart replaces it
    let tea = catalog_product(&storefront, "4").await;
    storefront.cart().add_to_cart(tea, 1).await.unwrap();
    assert_eq!(storefront.cart().get_cart().len(), 1);
}

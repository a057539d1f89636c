//! Integration tests for EliteShop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eliteshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart manager behaviour over whole operation sequences
//! - `session_flow` - Sign-in, sign-up and sign-out against the seeded directory
//! - `cross_context` - Changes made through one context seen by another
//! - `checkout_flow` - Order placement end to end
//!
//! The helpers here build storefronts with no simulated delays and the
//! cheapest credential hashing.

use std::sync::{Arc, Mutex};

use eliteshop_core::{Product, ProductId};
use eliteshop_storefront::config::{HashingConfig, Latency, StorefrontConfig};
use eliteshop_storefront::store::{MemoryStore, StoreHandle};
use eliteshop_storefront::{StoreEvent, Storefront};

/// Configuration with no delays and minimal hashing cost.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        latency: Latency::none(),
        hashing: HashingConfig::minimal(),
        ..StorefrontConfig::default()
    }
}

/// A storefront over `store`.
///
/// # Panics
///
/// Panics if the test configuration is rejected.
#[must_use]
pub fn storefront_over(store: StoreHandle) -> Storefront {
    Storefront::new(test_config(), store).unwrap_or_else(|e| panic!("storefront: {e}"))
}

/// A storefront over a fresh in-memory origin, returning the origin too.
#[must_use]
pub fn memory_storefront() -> (Storefront, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (storefront_over(store.clone()), store)
}

/// Every event published on `storefront`'s bus from now on.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<StoreEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn attach(storefront: &Storefront) -> Self {
        let log = Self::default();
        let sink = Arc::clone(&log.events);
        storefront.events().subscribe(move |event| {
            sink.lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(event.clone());
        });
        log
    }

    #[must_use]
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn last(&self) -> Option<StoreEvent> {
        self.events().pop()
    }
}

/// Fetch a catalog product.
///
/// # Panics
///
/// Panics if the catalog has no product with `id`.
pub async fn catalog_product(storefront: &Storefront, id: &str) -> Product {
    storefront
        .catalog()
        .get_product(&ProductId::new(id))
        .await
        .unwrap_or_else(|| panic!("no catalog product {id}"))
}

//! Application root shared by every presentation surface.

use std::sync::Arc;

use eliteshop_core::{Cart, Session};

use crate::catalog::MockCatalog;
use crate::config::StorefrontConfig;
use crate::events::{CartAction, CartUpdated, EventBus, SessionAction, UserStateChanged};
use crate::services::auth::{CredentialHasher, SessionManager};
use crate::services::cart::CartManager;
use crate::services::checkout::CheckoutService;
use crate::store::{self, ExternalChange, FileStore, ListenerId, StoreError, StoreHandle, keys};

/// Error building the application root.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid hashing parameters: {0}")]
    Hashing(#[from] argon2::Error),
    #[error("failed to open storage: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across the presentation layer.
///
/// This struct is cheaply cloneable via `Arc`. It owns the event bus and the
/// store handle, and wires the store's external-change listeners so that
/// changes made by other contexts are re-published locally with a `sync`
/// action. The listeners are removed when the last clone drops.
#[derive(Debug, Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

#[derive(Debug)]
struct StorefrontInner {
    config: StorefrontConfig,
    store: StoreHandle,
    events: EventBus,
    catalog: MockCatalog,
    cart: CartManager,
    session: SessionManager,
    checkout: CheckoutService,
    listeners: Vec<ListenerId>,
}

impl Storefront {
    /// Build the application root over `store`.
    ///
    /// # Errors
    ///
    /// Returns `StateError::Hashing` if the configured hashing parameters are
    /// out of range.
    pub fn new(config: StorefrontConfig, store: StoreHandle) -> Result<Self, StateError> {
        let hasher = CredentialHasher::new(&config.hashing)?;
        let events = EventBus::new();
        let latency = config.latency;

        let catalog = MockCatalog::new(latency);
        let cart = CartManager::new(Arc::clone(&store), events.clone(), latency);
        let session = SessionManager::new(
            Arc::clone(&store),
            events.clone(),
            hasher,
            latency,
            config.reauth_policy,
        );
        let checkout = CheckoutService::new(cart.clone(), session.clone(), latency);
        let listeners = watch_external_changes(&*store, &events);

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                store,
                events,
                catalog,
                cart,
                session,
                checkout,
                listeners,
            }),
        })
    }

    /// Build the application root over the file store named in `config`.
    ///
    /// Returns the file store handle alongside so callers can poll it for
    /// changes made by other processes.
    ///
    /// # Errors
    ///
    /// Returns `StateError::Store` if the file cannot be opened.
    pub fn open(config: StorefrontConfig) -> Result<(Self, Arc<FileStore>), StateError> {
        let file = Arc::new(FileStore::open(&config.data_file)?);
        let storefront = Self::new(config, file.clone())?;
        Ok((storefront, file))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &StoreHandle {
        &self.inner.store
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    #[must_use]
    pub fn catalog(&self) -> &MockCatalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}

impl Drop for StorefrontInner {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.store.remove_listener(id);
        }
    }
}

/// Register the listeners that mirror other contexts' changes onto `events`.
///
/// The callbacks capture only the bus, never the store, so a store holding
/// them does not keep itself alive.
fn watch_external_changes(
    store: &dyn store::KeyValueStore,
    events: &EventBus,
) -> Vec<ListenerId> {
    let cart_events = events.clone();
    let cart = store.on_external_change(
        keys::CART,
        Arc::new(move |change: &ExternalChange| {
            cart_events.publish(&cart_sync_event(change).into());
        }),
    );

    let session_events = events.clone();
    let session = store.on_external_change(
        keys::CURRENT_USER,
        Arc::new(move |change: &ExternalChange| {
            session_events.publish(&session_sync_event(change).into());
        }),
    );

    vec![cart, session]
}

fn cart_sync_event(change: &ExternalChange) -> CartUpdated {
    let cart: Cart = store::decode_record(&change.key, change.new_value.as_deref()).unwrap_or_default();
    tracing::debug!(items = cart.len(), "cart changed in another context");
    CartUpdated {
        cart,
        action: CartAction::Sync,
    }
}

fn session_sync_event(change: &ExternalChange) -> UserStateChanged {
    let user: Option<Session> = store::decode_record(&change.key, change.new_value.as_deref());
    let previous_user = store::decode_record(&change.key, change.old_value.as_deref());
    tracing::debug!(
        signed_in = user.is_some(),
        "session changed in another context"
    );
    UserStateChanged {
        user,
        action: SessionAction::Sync,
        previous_user,
    }
}

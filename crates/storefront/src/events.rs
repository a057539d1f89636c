//! In-process broadcast of state changes.
//!
//! The [`EventBus`] is owned by the application root and handed to every
//! component that publishes or observes state. Delivery is synchronous:
//! subscribers run in registration order inside the `publish` call.
//! Subscribers may subscribe, unsubscribe or publish while being called; the
//! subscriber list is snapshotted before delivery, so such changes apply from
//! the next event on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde::Serialize;

use eliteshop_core::{Cart, Product, ProductId, Session};

/// Name of the cart change event.
pub const CART_UPDATED: &str = "cart-updated";

/// Name of the session change event.
pub const USER_STATE_CHANGED: &str = "user-state-changed";

/// What happened to the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum CartAction {
    Add { product: Product, quantity: u32 },
    Remove { product_id: ProductId },
    Update { product_id: ProductId, quantity: u32 },
    Clear,
    /// Another context changed the persisted cart.
    Sync,
}

/// Payload of [`CART_UPDATED`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartUpdated {
    /// Cart as persisted after the change.
    pub cart: Cart,
    #[serde(flatten)]
    pub action: CartAction,
}

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Login,
    Register,
    Logout,
    /// Another context changed the persisted session.
    Sync,
}

/// Payload of [`USER_STATE_CHANGED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStateChanged {
    /// Session after the change, `None` when signed out.
    pub user: Option<Session>,
    pub action: SessionAction,
    /// Session before the change, set on logout and sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_user: Option<Session>,
}

/// A broadcast event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "detail", rename_all = "kebab-case")]
pub enum StoreEvent {
    CartUpdated(CartUpdated),
    UserStateChanged(UserStateChanged),
}

impl StoreEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CartUpdated(_) => CART_UPDATED,
            Self::UserStateChanged(_) => USER_STATE_CHANGED,
        }
    }
}

impl From<CartUpdated> for StoreEvent {
    fn from(event: CartUpdated) -> Self {
        Self::CartUpdated(event)
    }
}

impl From<UserStateChanged> for StoreEvent {
    fn from(event: UserStateChanged) -> Self {
        Self::UserStateChanged(event)
    }
}

/// Identifies a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Observer registry for [`StoreEvent`]s.
///
/// Cheaply cloneable; clones share the same subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

impl BusInner {
    fn subscribers(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Subscriber)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for every event published from now on.
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.subscribers().push((id, Arc::new(subscriber)));
        id
    }

    /// Register a subscriber that is removed when the returned guard drops.
    #[must_use = "the subscription ends when the guard is dropped"]
    pub fn subscribe_scoped<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        Subscription {
            id: self.subscribe(subscriber),
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove(id)
    }

    /// Deliver `event` to every current subscriber, in registration order.
    pub fn publish(&self, event: &StoreEvent) {
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();

        tracing::trace!(
            event = event.name(),
            subscribers = subscribers.len(),
            "publishing"
        );
        for subscriber in subscribers {
            subscriber(event);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Guard returned by [`EventBus::subscribe_scoped`].
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    bus: Weak<BusInner>,
}

impl Subscription {
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn clear_event() -> StoreEvent {
        CartUpdated {
            cart: Cart::new(),
            action: CartAction::Clear,
        }
        .into()
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let log = Arc::clone(&log);
            bus.subscribe(move |_| log.lock().unwrap().push(n));
        }

        bus.publish(&clear_event());
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_only_events_after_subscription() {
        let bus = EventBus::new();
        bus.publish(&clear_event());

        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let id = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(&clear_event());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&clear_event());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_may_unsubscribe_itself() {
        let bus = EventBus::new();
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicU64::new(0));

        let (b, s, c) = (bus.clone(), Arc::clone(&slot), Arc::clone(&count));
        let id = bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *s.lock().unwrap() {
                b.unsubscribe(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        bus.publish(&clear_event());
        bus.publish(&clear_event());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_scoped_subscription_ends_on_drop() {
        let bus = EventBus::new();
        let guard = bus.subscribe_scoped(|_| {});
        assert_eq!(bus.subscriber_count(), 1);
        drop(guard);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_cart_event_wire_shape() {
        let event: StoreEvent = CartUpdated {
            cart: Cart::new(),
            action: CartAction::Remove {
                product_id: ProductId::new("3"),
            },
        }
        .into();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "cart-updated");
        assert_eq!(value["detail"]["action"], "remove");
        assert_eq!(value["detail"]["productId"], "3");
        assert!(value["detail"]["cart"].is_array());
    }

    #[test]
    fn test_user_event_wire_shape() {
        let event: StoreEvent = UserStateChanged {
            user: None,
            action: SessionAction::Logout,
            previous_user: None,
        }
        .into();

        assert_eq!(event.name(), USER_STATE_CHANGED);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["detail"]["action"], "logout");
        assert!(value["detail"]["user"].is_null());
        assert!(value["detail"].get("previousUser").is_none());
    }
}

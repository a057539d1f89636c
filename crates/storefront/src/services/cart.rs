//! Cart state: the persisted cart and its change notifications.

use thiserror::Error;
use tracing::instrument;

use eliteshop_core::{Cart, CartItemError, Price, Product, ProductId};

use crate::config::Latency;
use crate::events::{CartAction, CartUpdated, EventBus};
use crate::store::{self, StoreError, StoreHandle, keys};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] CartItemError),

    #[error("failed to save cart: {0}")]
    Store(#[from] StoreError),
}

/// Owner of the persisted cart record.
///
/// Every mutation is a single read-modify-write of the whole cart followed by
/// one `cart-updated` publish. A failed write publishes nothing.
#[derive(Debug, Clone)]
pub struct CartManager {
    store: StoreHandle,
    events: EventBus,
    latency: Latency,
}

impl CartManager {
    #[must_use]
    pub const fn new(store: StoreHandle, events: EventBus, latency: Latency) -> Self {
        Self {
            store,
            events,
            latency,
        }
    }

    /// The persisted cart. Absent or corrupt records read as empty.
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        store::read_record(&*self.store, keys::CART).unwrap_or_default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero or overflowing
    /// quantity and `CartError::Store` if the cart cannot be saved.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: Product, quantity: u32) -> Result<Cart, CartError> {
        tokio::time::sleep(self.latency.cart_add).await;

        let mut cart = self.get_cart();
        cart.add(product.clone(), quantity)?;
        self.commit(cart, CartAction::Add { product, quantity })
    }

    /// Remove a product's entry. Removing an absent product still saves and
    /// publishes the unchanged cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the cart cannot be saved.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<Cart, CartError> {
        tokio::time::sleep(self.latency.cart_change).await;
        self.remove_now(product_id)
    }

    /// Set a product's quantity. Zero or negative removes the entry; a
    /// product not in the cart is left alone and nothing is published.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` exceeds the
    /// quantity range and `CartError::Store` if the cart cannot be saved.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        tokio::time::sleep(self.latency.cart_change).await;

        if quantity <= 0 {
            return self.remove_now(product_id);
        }
        let quantity = u32::try_from(quantity).map_err(|_| CartItemError::Overflow)?;

        let mut cart = self.get_cart();
        if !cart.set_quantity(product_id, quantity)? {
            tracing::debug!("product not in cart, nothing to update");
            return Ok(cart);
        }
        self.commit(
            cart,
            CartAction::Update {
                product_id: product_id.clone(),
                quantity,
            },
        )
    }

    /// Delete the cart record.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the record cannot be deleted.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), CartError> {
        tokio::time::sleep(self.latency.cart_change).await;
        self.take_cart()?;
        Ok(())
    }

    /// Delete the cart record and return the cart it held, with no delay
    /// between the read and the delete.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the record cannot be deleted.
    pub fn take_cart(&self) -> Result<Cart, CartError> {
        let taken = self.get_cart();
        self.store.remove(keys::CART)?;
        self.events.publish(
            &CartUpdated {
                cart: Cart::new(),
                action: CartAction::Clear,
            }
            .into(),
        );
        tracing::info!(items = taken.len(), "cart cleared");
        Ok(taken)
    }

    #[must_use]
    pub fn cart_total(cart: &Cart) -> Price {
        cart.total()
    }

    #[must_use]
    pub fn cart_count(cart: &Cart) -> u64 {
        cart.item_count()
    }

    fn remove_now(&self, product_id: &ProductId) -> Result<Cart, CartError> {
        let mut cart = self.get_cart();
        if !cart.remove(product_id) {
            tracing::debug!(%product_id, "product not in cart");
        }
        self.commit(
            cart,
            CartAction::Remove {
                product_id: product_id.clone(),
            },
        )
    }

    fn commit(&self, cart: Cart, action: CartAction) -> Result<Cart, CartError> {
        store::write_record(&*self.store, keys::CART, &cart)?;
        tracing::debug!(items = cart.len(), "cart saved");
        let event = CartUpdated {
            cart: cart.clone(),
            action,
        };
        self.events.publish(&event.into());
        Ok(cart)
    }
}

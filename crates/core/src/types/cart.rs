//! Cart value types.
//!
//! [`Cart`] is a plain value: it knows how to apply add/remove/set operations
//! and compute totals, but persistence and change broadcasting live in the
//! storefront's cart manager.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors from cart value operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    /// Quantities added to a cart must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// The resulting quantity does not fit the quantity type.
    #[error("quantity overflow")]
    Overflow,
}

/// One line of a cart: a product snapshot and how many of it.
///
/// `quantity` is always at least 1 for entries held by a [`Cart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// An ordered list of cart entries, in insertion order, at most one per
/// product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn entry(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    /// Add `quantity` units of `product`, merging with an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `CartItemError::ZeroQuantity` for a zero quantity and
    /// `CartItemError::Overflow` if the merged quantity overflows. The cart is
    /// unchanged on error.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), CartItemError> {
        if quantity == 0 {
            return Err(CartItemError::ZeroQuantity);
        }

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.product.id == product.id)
        {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CartItemError::Overflow)?;
        } else {
            self.entries.push(CartEntry { product, quantity });
        }
        Ok(())
    }

    /// Remove the entry for a product. Returns whether an entry was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product.id != product_id);
        self.entries.len() != before
    }

    /// Set the quantity of an existing entry. Returns `false` if the product
    /// is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartItemError::ZeroQuantity` for a zero quantity; use
    /// [`Cart::remove`] to drop an entry.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CartItemError> {
        if quantity == 0 {
            return Err(CartItemError::ZeroQuantity);
        }

        match self.entries.iter_mut().find(|e| &e.product.id == product_id) {
            Some(entry) => {
                entry.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sum of `price * quantity` over all entries.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

//! Display data derived from cart state.

use serde::Serialize;

use eliteshop_core::{Cart, CartEntry};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
    pub on_sale: bool,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id.to_string(),
            name: entry.product.name.clone(),
            quantity: entry.quantity,
            price: entry.product.price.to_string(),
            line_price: entry.line_total().to_string(),
            image: entry.product.thumbnail().map(String::from),
            on_sale: entry.product.is_on_sale(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eliteshop_core::{Price, Product, ProductId};

    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_cents(cents),
            original_price: None,
            description: String::new(),
            category: "beauty".to_owned(),
            images: vec![format!("https://img.example/{id}.jpg")],
            rating: 4.0,
            reviews: 1,
            in_stock: true,
            stock_count: 3,
            features: Vec::new(),
        }
    }

    #[test]
    fn test_empty_view() {
        assert_eq!(CartView::from(&Cart::new()), CartView::empty());
    }

    #[test]
    fn test_view_formats_prices() {
        let mut cart = Cart::new();
        cart.add(product("6", 14_999), 2).unwrap();
        cart.add(product("4", 3_499), 1).unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$334.97");
        assert_eq!(view.items[0].price, "$149.99");
        assert_eq!(view.items[0].line_price, "$299.98");
        assert_eq!(
            view.items[1].image.as_deref(),
            Some("https://img.example/4.jpg")
        );
    }
}

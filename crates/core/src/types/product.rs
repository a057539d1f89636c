//! Catalog types: products and categories.
//!
//! Field names serialize in camelCase so persisted cart snapshots keep the
//! same shape as the catalog records they were copied from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product as supplied by the catalog.
///
/// The catalog is expected to keep `price <= original_price` and to set
/// `in_stock` exactly when `stock_count > 0`; nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Pre-discount price, present only for products on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub description: String,
    /// Slug of the category this product belongs to.
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
    pub stock_count: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Product {
    /// Whether the product carries a pre-discount price.
    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    /// Whole-percent discount relative to the original price, if on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.amount();
        if original.is_zero() {
            return None;
        }
        let saved = (original - self.price.amount()) / original * Decimal::ONE_HUNDRED;
        u32::try_from(saved.round().mantissa()).ok()
    }

    /// First image, used as the thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Case-insensitive substring match against name and description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    /// Name of the icon shown next to the category.
    pub icon: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_cents(cents),
            original_price: None,
            description: "A test product".to_string(),
            category: "electronics".to_string(),
            images: vec![format!("https://img.example/{id}.jpg")],
            rating: 4.5,
            reviews: 10,
            in_stock: true,
            stock_count: 5,
            features: Vec::new(),
        }
    }

    #[test]
    fn test_discount_percent() {
        let mut p = product("1", 29999);
        assert_eq!(p.discount_percent(), None);

        p.original_price = Some(Price::from_cents(39999));
        assert!(p.is_on_sale());
        assert_eq!(p.discount_percent(), Some(25));
    }

    #[test]
    fn test_matches_search() {
        let p = product("1", 100);
        assert!(p.matches_search("product"));
        assert!(p.matches_search("test"));
        assert!(!p.matches_search("watch"));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let mut p = product("1", 100);
        p.original_price = Some(Price::from_cents(200));
        let value = serde_json::to_value(&p).unwrap();
        assert!(value.get("originalPrice").is_some());
        assert!(value.get("stockCount").is_some());
        assert!(value.get("inStock").is_some());

        let parsed: Product = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, p);
    }
}

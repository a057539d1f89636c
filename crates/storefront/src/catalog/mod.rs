//! Read-only product catalog.
//!
//! [`MockCatalog`] serves a fixed set of products and categories, awaiting a
//! configurable delay on every call to stand in for a network round trip.

mod data;

use tracing::instrument;

use eliteshop_core::{Category, Product, ProductId};

use crate::config::Latency;

/// Maximum number of featured products.
const FEATURED_LIMIT: usize = 4;

/// In-memory catalog with simulated latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCatalog {
    latency: Latency,
}

impl MockCatalog {
    #[must_use]
    pub const fn new(latency: Latency) -> Self {
        Self { latency }
    }

    /// Products in catalog order, optionally filtered by category slug
    /// (exact match) and search text (case-insensitive substring of name or
    /// description). Empty filters are ignored.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<&str>, search: Option<&str>) -> Vec<Product> {
        tokio::time::sleep(self.latency.list_products).await;

        let category = category.filter(|c| !c.is_empty());
        let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);

        data::PRODUCTS
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_search(n)))
            .cloned()
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Option<Product> {
        tokio::time::sleep(self.latency.get_product).await;
        data::PRODUCTS.iter().find(|p| &p.id == id).cloned()
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        tokio::time::sleep(self.latency.list_categories).await;
        data::CATEGORIES.clone()
    }

    /// The first products carrying an original (pre-discount) price.
    pub async fn featured_products(&self) -> Vec<Product> {
        tokio::time::sleep(self.latency.featured_products).await;
        data::PRODUCTS
            .iter()
            .filter(|p| p.is_on_sale())
            .take(FEATURED_LIMIT)
            .cloned()
            .collect()
    }
}

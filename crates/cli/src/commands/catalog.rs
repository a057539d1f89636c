//! Catalog queries.

use eliteshop_core::{Product, ProductId};
use eliteshop_storefront::{Storefront, StorefrontError};

/// One-line product summary.
pub fn product_line(product: &Product) -> String {
    let price = product.price.to_string();
    let sale = product
        .original_price
        .map(|original| format!("  was {original}"))
        .unwrap_or_default();
    format!("{:>3}  {:<30} {price:>9}{sale}", product.id, product.name)
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for product in products {
        println!("{}", product_line(product));
    }
}

pub async fn products(storefront: &Storefront, category: Option<&str>, search: Option<&str>) {
    let products = storefront.catalog().list_products(category, search).await;
    print_products(&products);
}

/// Show the full details of one product.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown id.
#[allow(clippy::print_stdout)]
pub async fn product(storefront: &Storefront, id: &str) -> Result<(), StorefrontError> {
    let product = storefront
        .catalog()
        .get_product(&ProductId::new(id))
        .await
        .ok_or_else(|| StorefrontError::NotFound(format!("Product {id}")))?;

    println!("{}", product.name);
    match (product.original_price, product.discount_percent()) {
        (Some(original), Some(off)) => {
            println!("{}  (was {original}, {off}% off)", product.price);
        }
        _ => println!("{}", product.price),
    }
    println!(
        "Rating {:.1} ({} reviews)  |  {}",
        product.rating,
        product.reviews,
        if product.in_stock {
            format!("{} in stock", product.stock_count)
        } else {
            "Out of stock".to_owned()
        }
    );
    println!();
    println!("{}", product.description);
    if !product.features.is_empty() {
        println!();
        for feature in &product.features {
            println!("  - {feature}");
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn categories(storefront: &Storefront) {
    for category in storefront.catalog().list_categories().await {
        println!("{:<12} {}", category.slug, category.name);
    }
}

pub async fn featured(storefront: &Storefront) {
    let products = storefront.catalog().featured_products().await;
    print_products(&products);
}

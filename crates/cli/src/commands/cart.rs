//! Cart commands.

use eliteshop_core::{Cart, ProductId};
use eliteshop_storefront::error::add_breadcrumb;
use eliteshop_storefront::views::CartView;
use eliteshop_storefront::{Storefront, StorefrontError};

/// Render a cart for the terminal.
pub fn render(cart: &Cart) -> String {
    let view = CartView::from(cart);
    if view.is_empty() {
        return "Your cart is empty.".to_owned();
    }

    let mut out = String::new();
    for item in &view.items {
        let sale = if item.on_sale { " (sale)" } else { "" };
        out.push_str(&format!(
            "{:>3}  {:<30} {:>3} x {:>9} = {:>10}{sale}\n",
            item.product_id, item.name, item.quantity, item.price, item.line_price
        ));
    }
    out.push_str(&format!(
        "{} item(s), subtotal {}",
        view.item_count, view.subtotal
    ));
    out
}

#[allow(clippy::print_stdout)]
pub fn show(storefront: &Storefront) {
    println!("{}", render(&storefront.cart().get_cart()));
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown product and the cart
/// error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn add(
    storefront: &Storefront,
    product_id: &str,
    quantity: u32,
) -> Result<(), StorefrontError> {
    let product = storefront
        .catalog()
        .get_product(&ProductId::new(product_id))
        .await
        .ok_or_else(|| StorefrontError::NotFound(format!("Product {product_id}")))?;
    let name = product.name.clone();

    let cart = storefront.cart().add_to_cart(product, quantity).await?;
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id)]));
    println!("Added {quantity} x {name}.");
    println!("{}", render(&cart));
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns the cart error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn remove(storefront: &Storefront, product_id: &str) -> Result<(), StorefrontError> {
    let cart = storefront
        .cart()
        .remove_from_cart(&ProductId::new(product_id))
        .await?;
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id)]),
    );
    println!("{}", render(&cart));
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns the cart error if the quantity is out of range or the cart cannot
/// be saved.
#[allow(clippy::print_stdout)]
pub async fn update(
    storefront: &Storefront,
    product_id: &str,
    quantity: i64,
) -> Result<(), StorefrontError> {
    let cart = storefront
        .cart()
        .update_quantity(&ProductId::new(product_id), quantity)
        .await?;
    println!("{}", render(&cart));
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns the cart error if the record cannot be deleted.
#[allow(clippy::print_stdout)]
pub async fn clear(storefront: &Storefront) -> Result<(), StorefrontError> {
    storefront.cart().clear_cart().await?;
    add_breadcrumb("cart", "Cleared cart", None);
    println!("Cart cleared.");
    Ok(())
}

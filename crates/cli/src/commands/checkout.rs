//! Order placement.

use clap::Args;
use secrecy::SecretString;

use eliteshop_storefront::services::checkout::{OrderConfirmation, PaymentDetails, ShippingAddress};
use eliteshop_storefront::{Storefront, StorefrontError};

/// Shipping and payment details for `checkout`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long = "zip")]
    zip_code: String,

    #[arg(long, default_value = "United States")]
    country: String,

    /// Defaults to the signed-in user's name
    #[arg(long)]
    name_on_card: Option<String>,

    #[arg(long)]
    card_number: String,

    /// MM/YY
    #[arg(long)]
    expiry: String,

    #[arg(long)]
    cvv: String,
}

/// Place an order for the current cart.
///
/// # Errors
///
/// Returns the checkout error when signed out, with an empty cart, with
/// missing details or if the cart cannot be cleared.
#[allow(clippy::print_stdout)]
pub async fn run(storefront: &Storefront, args: CheckoutArgs) -> Result<(), StorefrontError> {
    let name_on_card = args
        .name_on_card
        .or_else(|| storefront.session().current_session().map(|s| s.name))
        .unwrap_or_default();

    let shipping = ShippingAddress {
        street: args.street,
        city: args.city,
        state: args.state,
        zip_code: args.zip_code,
        country: args.country,
    };
    let payment = PaymentDetails {
        name_on_card,
        card_number: SecretString::from(args.card_number),
        expiry_date: args.expiry,
        cvv: SecretString::from(args.cvv),
    };

    println!("Processing order...");
    let confirmation = storefront
        .checkout()
        .place_order(shipping, &payment)
        .await?;
    println!("{}", receipt(&confirmation));
    Ok(())
}

fn receipt(order: &OrderConfirmation) -> String {
    let mut lines = vec![
        format!("Order {} confirmed.", order.order_number),
        format!(
            "Placed {} by {}",
            order.placed_at.format("%Y-%m-%d %H:%M UTC"),
            order.customer.name
        ),
    ];
    for entry in &order.items {
        lines.push(format!(
            "  {} x {}  {}",
            entry.quantity,
            entry.product.name,
            entry.line_total()
        ));
    }
    lines.push(format!("Subtotal  {}", order.subtotal));
    lines.push("Shipping  Free".to_owned());
    lines.push(format!("Total     {}", order.total));
    lines.push(format!(
        "Ships to {}, {}, {} {}, {}",
        order.shipping_address.street,
        order.shipping_address.city,
        order.shipping_address.state,
        order.shipping_address.zip_code,
        order.shipping_address.country
    ));
    lines.push(format!("Paid with card ending {}", order.card_last4));
    lines.join("\n")
}

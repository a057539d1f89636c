//! Simulated order placement.
//!
//! No payment is taken and no order is stored: placing an order validates
//! the input, waits out the processing delay, then takes the cart in one
//! step and returns a confirmation built from exactly what was taken.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use eliteshop_core::{CartEntry, Price, Session};

use crate::config::Latency;
use crate::error::add_breadcrumb;
use crate::services::auth::SessionManager;
use crate::services::cart::{CartError, CartManager};

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("please sign in to place an order")]
    NotAuthenticated,

    #[error("your cart is empty")]
    EmptyCart,

    /// A required shipping or payment field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: "United States".to_owned(),
        }
    }
}

/// Card details. Secret fields are redacted from `Debug` output.
#[derive(Debug)]
pub struct PaymentDetails {
    pub name_on_card: String,
    pub card_number: SecretString,
    pub expiry_date: String,
    pub cvv: SecretString,
}

/// Result of a placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: String,
    pub customer: Session,
    pub items: Vec<CartEntry>,
    pub shipping_address: ShippingAddress,
    /// Last four digits of the card, for display.
    pub card_last4: String,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

/// Places orders against the current cart and session.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    cart: CartManager,
    session: SessionManager,
    latency: Latency,
}

impl CheckoutService {
    #[must_use]
    pub const fn new(cart: CartManager, session: SessionManager, latency: Latency) -> Self {
        Self {
            cart,
            session,
            latency,
        }
    }

    /// Place an order for everything in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotAuthenticated` without a session,
    /// `CheckoutError::EmptyCart` if there is nothing to order,
    /// `CheckoutError::MissingField` for blank input and
    /// `CheckoutError::Cart` if the cart cannot be cleared.
    #[instrument(skip_all)]
    pub async fn place_order(
        &self,
        shipping: ShippingAddress,
        payment: &PaymentDetails,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.precheck()?;
        validate_shipping(&shipping)?;
        validate_payment(payment)?;

        tokio::time::sleep(self.latency.checkout).await;

        // The cart or session may have changed while processing.
        let customer = self.precheck()?;
        let cart = self.cart.take_cart()?;

        let subtotal = CartManager::cart_total(&cart);
        let confirmation = OrderConfirmation {
            order_number: order_number(),
            customer,
            items: cart.entries().to_vec(),
            shipping_address: shipping,
            card_last4: last4(&payment.card_number),
            subtotal,
            shipping: Price::ZERO,
            total: subtotal,
            placed_at: Utc::now(),
        };

        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_number", confirmation.order_number.as_str())]),
        );
        tracing::info!(
            order_number = %confirmation.order_number,
            user_id = %confirmation.customer.id,
            total = %confirmation.total,
            "order placed"
        );
        Ok(confirmation)
    }

    fn precheck(&self) -> Result<Session, CheckoutError> {
        let session = self
            .session
            .current_session()
            .ok_or(CheckoutError::NotAuthenticated)?;
        if self.cart.get_cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(session)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), CheckoutError> {
    if value.trim().is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(())
    }
}

fn validate_shipping(address: &ShippingAddress) -> Result<(), CheckoutError> {
    require(&address.street, "street address")?;
    require(&address.city, "city")?;
    require(&address.state, "state")?;
    require(&address.zip_code, "ZIP code")?;
    require(&address.country, "country")
}

fn validate_payment(payment: &PaymentDetails) -> Result<(), CheckoutError> {
    require(&payment.name_on_card, "name on card")?;
    require(payment.card_number.expose_secret(), "card number")?;
    require(&payment.expiry_date, "expiry date")?;
    require(payment.cvv.expose_secret(), "CVV")
}

fn order_number() -> String {
    let id: String = Uuid::new_v4().simple().to_string().chars().take(10).collect();
    format!("ES-{}", id.to_uppercase())
}

fn last4(card_number: &SecretString) -> String {
    let digits: Vec<char> = card_number
        .expose_secret()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let skip = digits.len().saturating_sub(4);
    digits.into_iter().skip(skip).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payment() -> PaymentDetails {
        PaymentDetails {
            name_on_card: "John Doe".to_owned(),
            card_number: SecretString::from("4242 4242 4242 1234".to_owned()),
            expiry_date: "12/29".to_owned(),
            cvv: SecretString::from("321".to_owned()),
        }
    }

    #[test]
    fn test_payment_debug_redacts_secrets() {
        let debug = format!("{:?}", payment());
        assert!(!debug.contains("4242"));
        assert!(!debug.contains("321"));
        assert!(debug.contains("John Doe"));
    }

    #[test]
    fn test_last4() {
        assert_eq!(last4(&payment().card_number), "1234");
        assert_eq!(last4(&SecretString::from("12".to_owned())), "12");
    }

    #[test]
    fn test_order_number_shape() {
        let number = order_number();
        assert!(number.starts_with("ES-"));
        assert_eq!(number.len(), 13);
        assert_ne!(number, order_number());
    }

    #[test]
    fn test_validate_shipping() {
        let mut address = ShippingAddress {
            street: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62701".to_owned(),
            ..ShippingAddress::default()
        };
        assert!(validate_shipping(&address).is_ok());

        address.zip_code = "  ".to_owned();
        assert!(matches!(
            validate_shipping(&address),
            Err(CheckoutError::MissingField("ZIP code"))
        ));
    }

    #[test]
    fn test_validate_payment() {
        let mut details = payment();
        assert!(validate_payment(&details).is_ok());

        details.cvv = SecretString::from("".to_owned());
        assert!(matches!(
            validate_payment(&details),
            Err(CheckoutError::MissingField("CVV"))
        ));
    }
}

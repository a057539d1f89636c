//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` type for the presentation layer.
//! System faults are captured to Sentry; user mistakes are only shown.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::state::StateError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Storage operation failed outside a service.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application root could not be built.
    #[error("Startup error: {0}")]
    State(#[from] StateError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// Whether this error is a fault of the system rather than of the input.
    #[must_use]
    pub const fn is_system_fault(&self) -> bool {
        match self {
            Self::Auth(err) => !err.is_user_facing(),
            Self::Cart(err) => matches!(err, CartError::Store(_)),
            Self::Checkout(err) => matches!(err, CheckoutError::Cart(CartError::Store(_))),
            Self::Store(_) | Self::Config(_) | Self::State(_) => true,
            Self::NotFound(_) => false,
        }
    }

    /// Message safe to show to the user.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) if err.is_user_facing() => err.to_string(),
            Self::Auth(_) => "Authentication failed, please try again".to_string(),
            Self::Cart(CartError::InvalidQuantity(_)) => "Invalid quantity".to_string(),
            Self::Cart(CartError::Store(StoreError::QuotaExceeded { .. }))
            | Self::Checkout(CheckoutError::Cart(CartError::Store(
                StoreError::QuotaExceeded { .. },
            ))) => "Storage is full, please free up some space".to_string(),
            Self::Checkout(CheckoutError::Cart(_)) => {
                "Could not complete your order, please try again".to_string()
            }
            Self::Checkout(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Cart(_) | Self::Store(_) | Self::State(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }

    /// Capture system faults to Sentry and log them.
    pub fn report(&self) {
        if self.is_system_fault() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "rejected request");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::ValidationError;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::NotFound("product 99".to_string());
        assert_eq!(err.to_string(), "Not found: product 99");
        assert_eq!(err.user_message(), "product 99 not found");
    }

    #[test]
    fn test_user_mistakes_are_not_faults() {
        let err = StorefrontError::from(AuthError::InvalidCredential);
        assert!(!err.is_system_fault());
        assert_eq!(err.user_message(), "invalid password, please try again");

        let err = StorefrontError::from(AuthError::from(ValidationError::InvalidEmail));
        assert!(!err.is_system_fault());

        let err = StorefrontError::from(CheckoutError::EmptyCart);
        assert!(!err.is_system_fault());
        assert_eq!(err.user_message(), "your cart is empty");
    }

    #[test]
    fn test_storage_faults_hide_details() {
        let quota = StoreError::QuotaExceeded {
            key: "ecommerce_cart".to_string(),
            limit: 16,
        };
        let err = StorefrontError::from(CartError::from(quota));
        assert!(err.is_system_fault());
        assert!(!err.user_message().contains("ecommerce_cart"));

        let err = StorefrontError::from(AuthError::PasswordHash);
        assert!(err.is_system_fault());
        assert_eq!(err.user_message(), "Authentication failed, please try again");
    }
}

//! Storefront state services.
//!
//! # Services
//!
//! - `auth` - Session state: sign-in, sign-up, sign-out and the account directory
//! - `cart` - Cart state and change notifications
//! - `checkout` - Simulated order placement
//!
//! Each service owns one persisted record, receives its store handle and
//! event bus at construction and publishes after every successful write.

pub mod auth;
pub mod cart;
pub mod checkout;

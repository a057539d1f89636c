//! Core types for EliteShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use account::{AccountSummary, Session, UserAccount};
pub use cart::{Cart, CartEntry, CartItemError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Category, Product};

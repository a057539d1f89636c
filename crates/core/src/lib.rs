//! EliteShop Core - Shared types library.
//!
//! This crate provides common types used across all EliteShop components:
//! - `storefront` - Client-side state: store, cart, session, catalog, checkout
//! - `cli` - Command-line front end over the storefront state
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no event delivery. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails, plus the
//!   product, cart and account records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

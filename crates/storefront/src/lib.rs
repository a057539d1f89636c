//! EliteShop storefront library.
//!
//! Client-side state for the storefront: the persisted cart, the signed-in
//! session, the account directory, the mock catalog and simulated checkout.
//! Presentation surfaces build a [`Storefront`] and drive it; every state
//! change is broadcast on its [`EventBus`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod state;
pub mod store;
pub mod views;

pub use error::{Result, StorefrontError};
pub use events::{EventBus, StoreEvent};
pub use state::Storefront;

//! CLI command implementations.
//!
//! Each command drives a [`Storefront`](eliteshop_storefront::Storefront) and
//! prints its result to stdout. Diagnostics go through `tracing` to stderr.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod watch;

//! Mobile Store Core - Shared domain types.
//!
//! This crate provides the types shared by every storefront component:
//! - `storefront` - Cart, product selection, catalog search and the REST client
//! - `cli` - Command-line surface over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, catalog records, cart line items and
//!   ordered deduplication

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

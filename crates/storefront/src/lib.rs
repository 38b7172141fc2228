//! Mobile Store storefront library.
//!
//! The view-facing core of the storefront, independent of any presentation
//! layer:
//! - [`cart`] - Cart store with best-effort persistence
//! - [`selection`] - Storage/color selection for a product view
//! - [`search`] - Debounced catalog search
//! - [`product_page`] - Product detail loading
//! - [`catalog`] - REST client for the catalog service
//! - [`storage`] - Key-value backends for the persisted cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod product_page;
pub mod search;
pub mod selection;
pub mod storage;

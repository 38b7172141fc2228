//! Core types for the mobile storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod dedupe;
pub mod id;
pub mod phone;
pub mod price;

pub use cart::CartLineItem;
pub use dedupe::{HasId, dedupe_by_id};
pub use id::*;
pub use phone::{ColorOption, Phone, PhoneDetail, PhoneSpecs, SpecRow, StorageOption};
pub use price::Price;

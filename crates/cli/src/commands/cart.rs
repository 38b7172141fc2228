//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! mstore cart show
//!
//! # Add a phone; the other option is filled with its first value
//! mstore cart add SMG-S24U --storage "256 GB"
//! mstore cart add SMG-S24U --color "#000000"
//!
//! # Remove one line, or everything
//! mstore cart remove "SMG-S24U-256 GB-#000000"
//! mstore cart clear
//! ```
//!
//! The cart lives in `MOBILE_STORE_DATA_DIR`.

use mobile_store_core::{LineId, PhoneId};
use mobile_store_storefront::cart::CartStore;
use mobile_store_storefront::catalog::{CatalogClient, CatalogError};
use mobile_store_storefront::selection::ProductSelection;

use crate::error::{AppError, Result};

/// Print the cart contents and totals.
#[allow(clippy::print_stdout)]
pub fn show(cart: &CartStore) {
    let snapshot = cart.snapshot();
    if snapshot.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in &snapshot.items {
        println!(
            "  {:<40} {:<32} {:<24} {}",
            item.line_id,
            item.display_name(),
            item.configuration_label(),
            item.unit_price
        );
    }
    println!();
    println!("CART ({})  TOTAL {}", snapshot.count, snapshot.total_price);
}

/// Resolve a configuration of `phone_id` and add it to the cart.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched, an option is unknown,
/// or neither option was given.
#[allow(clippy::print_stdout)]
pub async fn add(
    cart: &mut CartStore,
    client: &CatalogClient,
    phone_id: &str,
    storage: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let detail = client
        .get_product_by_id(&PhoneId::new(phone_id))
        .await
        .map_err(|e| match e {
            CatalogError::Api { status: 404, .. } => AppError::NotFound(phone_id.to_string()),
            other => other.into(),
        })?;

    let mut selection = ProductSelection::for_product(&detail);
    if let Some(capacity) = storage {
        let option = selection.storage_option(capacity)?;
        selection.select_storage(option);
    }
    if let Some(color) = color {
        let option = selection.color_option(color)?;
        selection.select_color(option);
    }

    let item = selection.require_line_item(&detail)?;
    let name = item.display_name();
    let label = item.configuration_label();

    if cart.add_item(item)? {
        tracing::info!(phone_id, "Added to cart");
        println!("Added {name} ({label}) for {}", selection.display_price());
    } else {
        println!("{name} ({label}) is already in your cart");
    }

    show(cart);
    Ok(())
}

/// Remove one line. Removing an absent line is not an error.
#[allow(clippy::print_stdout)]
pub fn remove(cart: &mut CartStore, line_id: &str) {
    if cart.remove_item(&LineId::new(line_id)) {
        println!("Removed {line_id}");
    } else {
        println!("{line_id} is not in your cart");
    }
    show(cart);
}

/// Empty the cart.
pub fn clear(cart: &mut CartStore) {
    cart.clear();
    tracing::info!("Cart cleared");
    show(cart);
}

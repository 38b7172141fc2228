//! Catalog listing and product detail commands.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! mstore products
//!
//! # Search the catalog
//! mstore products --search galaxy
//!
//! # Show one product with its options and specifications
//! mstore product SMG-S24U
//! ```

use mobile_store_core::{Phone, PhoneDetail, PhoneId, dedupe_by_id};
use mobile_store_storefront::catalog::CatalogClient;
use mobile_store_storefront::product_page::{ProductPage, load_product_page};

use crate::error::Result;

/// List products, optionally filtered by `search`.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
#[allow(clippy::print_stdout)]
pub async fn list(client: &CatalogClient, search: Option<&str>) -> Result<()> {
    let products = dedupe_by_id(client.list_products(search).await?);
    tracing::debug!(count = products.len(), "Fetched products");

    println!("{} RESULTS", products.len());
    print_products(&products);
    Ok(())
}

/// Show one product, or the error view if it cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn show(client: &CatalogClient, id: &str) {
    match load_product_page(client, &PhoneId::new(id)).await {
        ProductPage::Loaded(detail) => print_detail(&detail),
        ProductPage::Failed { message } => {
            println!("Unable to load product");
            println!("{message}");
        }
    }
}

/// One line per product: id, name and starting price.
#[allow(clippy::print_stdout)]
pub fn print_products(products: &[Phone]) {
    for phone in products {
        println!(
            "  {:<16} {:<32} {}",
            phone.id,
            format!("{} {}", phone.brand, phone.name).trim(),
            phone.base_price
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_detail(detail: &PhoneDetail) {
    println!("{} {}", detail.brand, detail.name);
    println!("{}", detail.price_label(None));
    if detail.rating > 0.0 {
        println!("Rating: {:.1}", detail.rating);
    }

    if !detail.storage_options.is_empty() {
        println!();
        println!("Storage:");
        for option in &detail.storage_options {
            println!("  {:<12} {}", option.capacity, option.price);
        }
    }

    if !detail.color_options.is_empty() {
        println!();
        println!("Colors:");
        for option in &detail.color_options {
            println!("  {:<20} {}", option.name, option.hex_code);
        }
    }

    let rows = detail.spec_rows();
    if !rows.is_empty() {
        println!();
        println!("Specifications:");
        for row in rows {
            println!("  {:<20} {}", row.label, row.value);
        }
    }

    if !detail.similar_products.is_empty() {
        println!();
        println!("Similar items:");
        print_products(&detail.similar_products);
    }
}

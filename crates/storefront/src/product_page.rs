//! Product detail loading.

use mobile_store_core::{PhoneDetail, PhoneId, dedupe_by_id};
use tracing::{instrument, warn};

use crate::catalog::ProductCatalog;

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unable to load product data.";

/// Outcome of loading a product page.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductPage {
    Loaded(Box<PhoneDetail>),
    /// Data for the error view.
    Failed { message: String },
}

impl ProductPage {
    /// The loaded product, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&PhoneDetail> {
        match self {
            Self::Loaded(detail) => Some(detail),
            Self::Failed { .. } => None,
        }
    }
}

/// Load the product `id` for display.
///
/// Never fails: errors become [`ProductPage::Failed`]. Similar products are
/// deduplicated by id.
#[instrument(skip(catalog), fields(id = %id))]
pub async fn load_product_page(catalog: &dyn ProductCatalog, id: &PhoneId) -> ProductPage {
    match catalog.get_product_by_id(id).await {
        Ok(mut detail) => {
            detail.similar_products = dedupe_by_id(std::mem::take(&mut detail.similar_products));
            ProductPage::Loaded(Box::new(detail))
        }
        Err(err) => {
            warn!(error = %err, "Failed to load product");
            let message = err.to_string();
            ProductPage::Failed {
                message: if message.is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    message
                },
            }
        }
    }
}

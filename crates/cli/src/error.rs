//! Unified error handling with Sentry integration.
//!
//! Every command returns `Result<T, AppError>`; `main` reports the error and
//! sets the exit status.

use mobile_store_storefront::cart::CartError;
use mobile_store_storefront::catalog::CatalogError;
use mobile_store_storefront::config::ConfigError;
use mobile_store_storefront::selection::SelectionError;
use thiserror::Error;

/// Application-level error type for the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart rejected the operation.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Storage or color could not be resolved.
    #[error("{0}")]
    Selection(#[from] SelectionError),

    /// Reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Log the error, capturing service failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::Catalog(_) | Self::Io(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::error!(error = %self, "Command failed");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

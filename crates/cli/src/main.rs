//! Mobile Store CLI - Browse the phone catalog and manage the cart.
//!
//! # Usage
//!
//! ```bash
//! # List or search products
//! mstore products
//! mstore products --search iphone
//!
//! # Product detail
//! mstore product APL-IP15
//!
//! # Cart
//! mstore cart show
//! mstore cart add APL-IP15 --storage "128 GB"
//! mstore cart remove "APL-IP15-128 GB-#1F2020"
//! mstore cart clear
//!
//! # Interactive search, one query per line
//! mstore browse
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog, optionally filtered
//! - `product` - Show one product
//! - `cart` - Show and change the persisted cart
//! - `browse` - Debounced search over stdin

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mobile_store_storefront::cart::CartStore;
use mobile_store_storefront::catalog::CatalogClient;
use mobile_store_storefront::config::StorefrontConfig;
use mobile_store_storefront::storage::FileStore;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

use error::{AppError, Result};

#[derive(Parser)]
#[command(name = "mstore")]
#[command(author, version, about = "Mobile Store command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a product's details
    Product {
        /// Product id
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Search interactively, reading one query per line from stdin
    Browse,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a phone configuration
    Add {
        /// Product id
        phone_id: String,

        /// Storage capacity (e.g. "256 GB")
        #[arg(short, long)]
        storage: Option<String>,

        /// Color name or hex code
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a line by its line id
    Remove {
        /// Line id as shown by `cart show`
        line_id: String,
    },
    /// Remove every line
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration is needed for Sentry, which must start before tracing
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mobile_store_storefront=info,mobile_store_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(AppError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<()> {
    let client = CatalogClient::new(&config.catalog);

    match cli.command {
        Commands::Products { search } => {
            commands::products::list(&client, search.as_deref()).await?;
        }
        Commands::Product { id } => commands::products::show(&client, &id).await,
        Commands::Cart { action } => {
            let mut cart = CartStore::open(Arc::new(FileStore::new(config.data_dir.clone())));
            match action {
                CartAction::Show => commands::cart::show(&cart),
                CartAction::Add {
                    phone_id,
                    storage,
                    color,
                } => {
                    commands::cart::add(
                        &mut cart,
                        &client,
                        &phone_id,
                        storage.as_deref(),
                        color.as_deref(),
                    )
                    .await?;
                }
                CartAction::Remove { line_id } => commands::cart::remove(&mut cart, &line_id),
                CartAction::Clear => commands::cart::clear(&mut cart),
            }
        }
        Commands::Browse => commands::browse::run(&client, config.search_debounce).await?,
    }
    Ok(())
}

//! ITX Store CLI - Terminal storefront for the product catalog.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (served from the one-hour cache when fresh)
//! itx products
//! itx products --search pixel
//!
//! # Inspect one product and its variant options
//! itx product ZmGrkLRPXOTpxsU4jjAcv
//!
//! # Manage the local cart
//! itx cart add ZmGrkLRPXOTpxsU4jjAcv --color 1000 --storage 2000
//! itx cart list
//! itx cart remove 0
//! itx cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `ITX_API_BASE_URL` - Product API endpoint (optional)
//! - `ITX_CACHE_TTL_SECS` - Response cache TTL in seconds (optional)
//! - `ITX_CACHE_DIR` - Cache and cart storage directory (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]
// This binary's job is user-facing terminal output.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use itx_store_client::{CachedApiClient, CartStore, FileStore, StoreConfig};
use itx_store_core::OptionCode;

mod commands;

#[derive(Parser)]
#[command(name = "itx")]
#[command(author, version, about = "Terminal storefront for the ITX product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products {
        /// Keep only products whose brand or model contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one product with its variant options
    Product {
        /// Catalog id of the product
        id: String,
    },
    /// Manage the local shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product variant to the cart
    Add {
        /// Catalog id of the product
        id: String,

        /// Color code; defaults to the product's first color
        #[arg(long)]
        color: Option<OptionCode>,

        /// Storage code; defaults to the product's first storage size
        #[arg(long)]
        storage: Option<OptionCode>,
    },
    /// List the cart contents
    List,
    /// Remove the item at the given position (see `cart list`)
    Remove { index: usize },
    /// Remove all items
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing; default to warnings so command output stays clean.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    let client = CachedApiClient::from_config(&config)?;
    // The cart shares the storage directory with the cache; its key lives
    // outside the cache namespace.
    let cart = CartStore::new(FileStore::new(&config.cache_dir)?);

    match cli.command {
        Commands::Products { search } => {
            commands::products::list(&client, search.as_deref()).await?;
        }
        Commands::Product { id } => commands::products::show(&client, &id).await?,
        Commands::Cart { action } => match action {
            CartAction::Add { id, color, storage } => {
                commands::cart::add(&client, &cart, &id, color, storage).await?;
            }
            CartAction::List => commands::cart::list(&cart),
            CartAction::Remove { index } => commands::cart::remove(&cart, index),
            CartAction::Clear => commands::cart::clear(&cart),
        },
    }
    Ok(())
}

//! RocketShoes CLI - drive the cart, blog and gallery from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rocketshoes cart show
//!
//! # Add one unit of product 3, then set it to 4 units
//! rocketshoes cart add 3
//! rocketshoes cart update 3 4
//!
//! # Read the blog
//! rocketshoes blog list --all
//! rocketshoes blog show como-utilizar-hooks
//!
//! # Browse and upload gallery images
//! rocketshoes gallery list --pages 2
//! rocketshoes gallery upload --file doge.png --url https://i.ibb.co/doge.png \
//!     --title Doge --description "The best doge"
//! ```
//!
//! Configuration comes from the environment (and `.env`), see
//! `rocketshoes_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Read blog posts
    Blog {
        #[command(subcommand)]
        action: BlogAction,
    },
    /// Browse and upload gallery images
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart with subtotals and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product entirely
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,
        /// New quantity (at least 1)
        amount: u32,
    },
}

#[derive(Subcommand)]
enum BlogAction {
    /// List posts
    List {
        /// Posts per page
        #[arg(short, long, default_value_t = rocketshoes_storefront::content::DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Keep loading pages until there are no more
        #[arg(short, long)]
        all: bool,
    },
    /// Show a single post
    Show {
        /// Post uid
        uid: String,
    },
}

#[derive(Subcommand)]
enum GalleryAction {
    /// List images
    List {
        /// Maximum number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Register an uploaded image
    Upload {
        /// Local image file (checked for size and format)
        #[arg(short, long)]
        file: PathBuf,

        /// URL where the image is hosted
        #[arg(short, long, default_value = "")]
        url: String,

        /// Image title (2-20 characters)
        #[arg(short, long)]
        title: String,

        /// Image description (up to 65 characters)
        #[arg(short, long)]
        description: String,
    },
}

#[tokio::main]
#[allow(clippy::print_stderr)] // tracing is not initialized until config loads
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Keep the guard alive until exit
    let _sentry_guard = rocketshoes_storefront::telemetry::init(&config.telemetry);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => {
            let store = commands::cart::open_store(config)?;
            match action {
                CartAction::Show => {}
                CartAction::Add { product_id } => store.add_product(product_id).await?,
                CartAction::Remove { product_id } => store.remove_product(product_id)?,
                CartAction::Update { product_id, amount } => {
                    commands::cart::update(&store, product_id, amount).await?;
                }
            }
            commands::cart::print(&store.cart());
        }
        Commands::Blog { action } => match action {
            BlogAction::List { page_size, all } => {
                commands::blog::list(config, page_size, all).await?;
            }
            BlogAction::Show { uid } => commands::blog::show(config, &uid).await?,
        },
        Commands::Gallery { action } => match action {
            GalleryAction::List { pages } => commands::gallery::list(config, pages).await?,
            GalleryAction::Upload {
                file,
                url,
                title,
                description,
            } => {
                commands::gallery::upload(config, &file, url, title, description).await?;
            }
        },
    }
    Ok(())
}

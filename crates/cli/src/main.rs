//! Youm's Interior CLI - browse the boutique, manage a cart and order.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! boutique products --search lampe --category decoration
//!
//! # Manage the cart
//! boutique cart add 1 --qty 2
//! boutique cart set 1 3
//! boutique cart show
//!
//! # Send the order
//! boutique checkout --name "Awa Diop" --email awa@example.sn --address "Rue 10, Dakar"
//!
//! # Write to the shop
//! boutique contact --name Awa --email awa@example.sn --phone 770000000 --message "Bonjour"
//! ```
//!
//! # Environment Variables
//!
//! - `BOUTIQUE_SERVER_URL` - Storefront base URL (default: <http://localhost:3002>)
//! - `BOUTIQUE_CART_FILE` - Cart file (default: `youms_interior_cart_v1.json`)
//! - `RUST_LOG` - Log filter for stderr output (default: warn)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use boutique_cli::commands::{self, cart::CartAction, checkout::CheckoutArgs, contact::ContactArgs};
use boutique_cli::{DEFAULT_CART_FILE, JsonFileCartRepository, Shop, StorefrontClient};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Youm's Interior boutique client")]
struct Cli {
    /// Storefront base URL
    #[arg(
        long,
        global = true,
        env = "BOUTIQUE_SERVER_URL",
        default_value = "http://localhost:3002"
    )]
    server: String,

    /// Where the cart is kept between runs
    #[arg(long, global = true, env = "BOUTIQUE_CART_FILE", default_value = DEFAULT_CART_FILE)]
    cart_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Text to look for in names and descriptions
        #[arg(short, long)]
        search: Option<String>,
        /// Category to show (`tous` for all)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order the cart contents
    Checkout(CheckoutArgs),
    /// Send a message to the shop
    Contact(ContactArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let client = StorefrontClient::new(&cli.server)?;

    let output = match cli.command {
        Commands::Products { search, category } => {
            commands::catalog::list(&client, search.as_deref(), category.as_deref()).await?
        }
        Commands::Cart { action } => {
            let mut shop = Shop::open(client, JsonFileCartRepository::new(cli.cart_file));
            commands::cart::run(&mut shop, action).await?
        }
        Commands::Checkout(args) => {
            let mut shop = Shop::open(client, JsonFileCartRepository::new(cli.cart_file));
            commands::checkout::run(&mut shop, args).await?
        }
        Commands::Contact(args) => commands::contact::run(&client, args).await?,
    };
    Ok(output)
}

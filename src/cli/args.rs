use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopping-cart")]
#[command(about = "A shopping cart that remembers what you picked from the menu")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// HTML page holding the product cards and the cart summary
    #[arg(short, long, global = true)]
    pub page: Option<PathBuf>,

    /// Storage location (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an item to the cart
    Add {
        /// Item name (prompted when omitted)
        name: Option<String>,
        /// Unit price, e.g. "12.50" or "12.50 €" (prompted when omitted)
        price: Option<String>,
    },
    /// Add a product card from the page, like clicking its button
    Buy {
        /// Product title as shown on the card
        product: String,
    },
    /// List the product cards found on the page
    Products,
    /// Show the cart
    Show,
    /// Print the cart total
    Total,
    /// Rewrite the cart summary of the page
    Render {
        /// Write the rendered page here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

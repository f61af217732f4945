//! CLI command implementations.

pub mod bundle;
pub mod cart;
pub mod config;
pub mod search;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Free text, prefix-matched against title, SKU, vendor, type and tags.
    pub text: Option<String>,

    /// Tag directive: commas AND, a pipe in the last segment ORs (e.g. "kit,skate|surf").
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Product type.
    #[arg(long = "type")]
    pub product_type: Option<String>,

    /// Vendor.
    #[arg(long)]
    pub vendor: Option<String>,

    /// Only products available for sale.
    #[arg(long)]
    pub in_stock: bool,

    /// Minimum variant price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum variant price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort order (relevance, price-asc, price-desc, name-asc, name-desc, newest, best-selling).
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    /// Results per page.
    #[arg(short, long, default_value = "24")]
    pub limit: u32,

    /// Continue after this cursor.
    #[arg(long)]
    pub after: Option<String>,

    /// Print the compiled query without contacting the storefront.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the bundle command.
#[derive(Args)]
pub struct BundleArgs {
    /// Product handle.
    pub handle: String,

    /// Fail on unreadable kit metadata instead of treating the product as plain.
    #[arg(long)]
    pub strict: bool,

    /// Currency for the retail value total.
    #[arg(long, default_value = "USD")]
    pub currency: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the current cart.
    Show,
    /// Add a variant to the cart.
    Add {
        /// Variant (merchandise) id.
        variant: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Product handle; adds kit components alongside premium kits.
        #[arg(short, long)]
        product: Option<String>,
    },
    /// Change a line's quantity (0 removes it).
    Update {
        /// Line id.
        line: String,
        /// New quantity.
        quantity: u32,
    },
    /// Remove a line.
    Remove {
        /// Line id.
        line: String,
    },
    /// Forget the current cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the hosted checkout URL.
    Checkout,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Storefront GraphQL endpoint.
        #[arg(short, long, default_value = "https://your-shop.myshopify.com/api/2024-07/graphql.json")]
        endpoint: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

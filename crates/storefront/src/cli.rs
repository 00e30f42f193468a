use clap::{Args, Parser, Subcommand};

use storefront_catalog::SortOrder;
use storefront_core::ProductId;

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Storefront demo shell", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List products, optionally filtered and sorted.
    Products {
        #[arg(long)]
        search: Option<String>,
        /// Category name, or "all".
        #[arg(long)]
        category: Option<String>,
        /// default | price-low | price-high | name
        #[arg(long, default_value = "default")]
        sort: SortOrder,
    },
    /// List the distinct product categories.
    Categories,
    #[command(subcommand)]
    Cart(CartCommand),
    /// Place the order and empty the cart.
    Checkout,
    Login {
        token: String,
    },
    Logout,
    /// Product administration. Requires a signed-in session.
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
    Show,
    Add {
        product_id: ProductId,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },
    Remove {
        product_id: ProductId,
    },
    /// Replace a line's quantity; 0 or less removes it.
    Set {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Create(ProductForm),
    Update {
        product_id: ProductId,
        #[command(flatten)]
        form: ProductForm,
    },
    Delete {
        product_id: ProductId,
    },
}

#[derive(Args, Debug)]
pub struct ProductForm {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub price: f64,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub image: String,
}

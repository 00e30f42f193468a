mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;

use storefront::{FileStore, LocalStore, Storefront, StorefrontConfig};
use storefront_cart::OrderSummary;
use storefront_catalog::{CatalogAdmin, CatalogQuery, CatalogSource, HttpCatalog, NewProduct, categories};
use storefront_core::Money;
use storefront_events::{EventBus, InMemoryEventBus, Subscription};
use storefront_sync::{HttpCartSync, SyncDispatcher, SyncNotification};

use crate::cli::{AdminCommand, CartCommand, Cli, Command, ProductForm};

/// How long a cart command waits for its background sync to report back.
const SYNC_WAIT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env()?;
    storefront_observability::init_with(config.log_format);

    let catalog = HttpCatalog::new(config.api_url.clone());
    let notifications = Arc::new(InMemoryEventBus::<SyncNotification>::new());
    let sync = SyncDispatcher::new(
        Arc::new(HttpCartSync::new(config.api_url.clone())),
        Arc::clone(&notifications),
        config.user_id,
    );
    let store: Arc<dyn LocalStore> = Arc::new(FileStore::new(&config.state_path));
    let mut shop = Storefront::load(store)
        .with_context(|| format!("loading {}", config.state_path.display()))?
        .with_pricing(config.pricing)
        .with_sync(sync);

    match cli.command {
        Command::Products {
            search,
            category,
            sort,
        } => {
            let mut query = CatalogQuery::new().sort(sort);
            if let Some(term) = search {
                query = query.search(term);
            }
            if let Some(category) = category {
                query = query.category(category);
            }
            for product in query.apply(&catalog.list_products().await?) {
                println!(
                    "{:>4}  {:>9}  {:<16}  {}",
                    product.id, product.price, product.category, product.title
                );
            }
        }
        Command::Categories => {
            for category in categories(&catalog.list_products().await?) {
                println!("{category}");
            }
        }
        Command::Cart(command) => {
            let outcomes = notifications.subscribe();
            run_cart_command(&mut shop, &catalog, command).await?;
            await_sync(&shop, outcomes).await;
        }
        Command::Checkout => {
            let outcomes = notifications.subscribe();
            let summary = shop.checkout()?;
            println!("order placed");
            print_summary(&summary);
            await_sync(&shop, outcomes).await;
        }
        Command::Login { token } => {
            shop.sign_in(token)?;
            println!("signed in");
        }
        Command::Logout => {
            shop.sign_out()?;
            println!("signed out");
        }
        Command::Admin(command) => {
            if !shop.is_authenticated() {
                bail!("admin commands require `storefront login <token>` first");
            }
            run_admin_command(&catalog, command).await?;
        }
    }

    Ok(())
}

async fn run_cart_command(
    shop: &mut Storefront,
    catalog: &HttpCatalog,
    command: CartCommand,
) -> anyhow::Result<()> {
    if !matches!(command, CartCommand::Show) && shop.cart_id().is_none() {
        if let Err(err) = shop.open_remote_cart().await {
            tracing::warn!(%err, "remote cart unavailable; continuing locally");
        }
    }

    match command {
        CartCommand::Show => {}
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            shop.add_product_by_id(catalog, product_id, quantity).await?;
        }
        CartCommand::Remove { product_id } => {
            shop.remove_item(product_id)?;
        }
        CartCommand::Set {
            product_id,
            quantity,
        } => {
            shop.set_quantity(product_id, quantity)?;
        }
        CartCommand::Clear => {
            shop.clear()?;
        }
    }

    if shop.cart().is_empty() {
        println!("cart is empty");
    } else {
        for line in shop.cart().lines() {
            println!(
                "{:>4}  {:>3} x {:>9} = {:>9}  {}",
                line.product_id,
                line.quantity,
                line.unit_price,
                line.line_total(),
                line.title
            );
        }
    }
    print_summary(&shop.summary());
    Ok(())
}

async fn run_admin_command(catalog: &HttpCatalog, command: AdminCommand) -> anyhow::Result<()> {
    match command {
        AdminCommand::Create(form) => {
            let product = catalog.create_product(new_product(form)?).await?;
            println!("created product {}", product.id);
        }
        AdminCommand::Update { product_id, form } => {
            let product = catalog.update_product(product_id, new_product(form)?).await?;
            println!("updated product {}", product.id);
        }
        AdminCommand::Delete { product_id } => {
            catalog.delete_product(product_id).await?;
            println!("deleted product {product_id}");
        }
    }
    Ok(())
}

fn new_product(form: ProductForm) -> anyhow::Result<NewProduct> {
    let product = NewProduct {
        title: form.title,
        price: Money::from_decimal(form.price)?,
        description: form.description,
        category: form.category,
        image: form.image,
    };
    product.validate()?;
    Ok(product)
}

fn print_summary(summary: &OrderSummary) {
    println!("items:    {}", summary.item_count);
    println!("subtotal: {}", summary.subtotal);
    if summary.free_shipping_eligible {
        println!("shipping: free");
    } else {
        println!("shipping: {}", summary.shipping_cost);
    }
    println!("tax:      {}", summary.tax);
    println!("total:    {}", summary.total);
}

/// Wait for the outcome of the sync the last command dispatched, if any.
async fn await_sync(shop: &Storefront, outcomes: Subscription<SyncNotification>) {
    let Some(ticket) = shop.last_sync_ticket() else {
        return;
    };

    let waited = tokio::task::spawn_blocking(move || {
        loop {
            match outcomes.recv_timeout(SYNC_WAIT) {
                Ok(note) if note.ticket() == ticket => return Some(note),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    })
    .await;

    match waited {
        Ok(Some(note)) if note.is_failure() => {
            eprintln!("warning: remote cart sync failed; local cart kept");
        }
        Ok(Some(_)) => {}
        Ok(None) => tracing::warn!(%ticket, "no sync outcome before exit"),
        Err(err) => tracing::error!(%err, "sync wait task failed"),
    }
}

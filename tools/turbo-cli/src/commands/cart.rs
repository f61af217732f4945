//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use turbo_commerce::cart::{AddToCart, Cart, CartManager, CartStatus};
use turbo_commerce::CartLineId;
use turbo_cache::FileStore;
use turbo_data::StorefrontClient;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

type Manager = CartManager<StorefrontClient, FileStore>;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;

    match args.command {
        CartCommand::Show => show_cart(&manager, ctx).await,
        CartCommand::Add {
            variant,
            quantity,
            product,
        } => add(&manager, ctx, variant, quantity, product).await,
        CartCommand::Update { line, quantity } => update(&manager, ctx, &line, quantity).await,
        CartCommand::Remove { line } => remove(&manager, ctx, &line).await,
        CartCommand::Clear { yes } => clear(&manager, ctx, yes),
        CartCommand::Checkout => checkout(&manager, ctx).await,
    }
}

async fn rehydrate(manager: &Manager, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading cart...");
    let result = manager.rehydrate().await;
    spinner.finish_and_clear();
    result.context("Failed to load cart")?;
    Ok(())
}

async fn show_cart(manager: &Manager, ctx: &Context) -> Result<()> {
    rehydrate(manager, ctx).await?;
    match manager.cart() {
        Some(cart) => print_cart(&cart, manager.status(), ctx),
        None => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::Value::Null);
            } else {
                ctx.output.info("No active cart");
            }
        }
    }
    Ok(())
}

async fn add(
    manager: &Manager,
    ctx: &Context,
    variant: String,
    quantity: u32,
    product: Option<String>,
) -> Result<()> {
    rehydrate(manager, ctx).await?;

    let mut request = AddToCart::new(variant, quantity);
    if let Some(handle) = product {
        request = request.with_product_handle(handle);
    }
    let before = manager.cart().map_or(0, |cart| cart.lines.len());

    let spinner = ctx.output.spinner("Adding to cart...");
    let result = manager.add_product_to_cart(request).await;
    spinner.finish_and_clear();
    let cart = result.context("Failed to add to cart")?;

    ctx.output.success(&format!(
        "Cart now has {} item(s) across {} line(s) ({} new)",
        cart.total_quantity,
        cart.lines.len(),
        cart.lines.len().saturating_sub(before)
    ));
    print_cart(&cart, manager.status(), ctx);
    Ok(())
}

async fn update(manager: &Manager, ctx: &Context, line: &str, quantity: u32) -> Result<()> {
    rehydrate(manager, ctx).await?;

    let spinner = ctx.output.spinner("Updating line...");
    let result = manager.update_line(&CartLineId::new(line), quantity).await;
    spinner.finish_and_clear();
    let cart = result.context("Failed to update line")?;

    ctx.output.success(&format!("Updated {}", line));
    print_cart(&cart, manager.status(), ctx);
    Ok(())
}

async fn remove(manager: &Manager, ctx: &Context, line: &str) -> Result<()> {
    rehydrate(manager, ctx).await?;

    let spinner = ctx.output.spinner("Removing line...");
    let result = manager.remove_line(&CartLineId::new(line)).await;
    spinner.finish_and_clear();
    let cart = result.context("Failed to remove line")?;

    ctx.output.success(&format!("Removed {}", line));
    print_cart(&cart, manager.status(), ctx);
    Ok(())
}

fn clear(manager: &Manager, ctx: &Context, yes: bool) -> Result<()> {
    if manager.cart_id()?.is_none() {
        ctx.output.info("No active cart");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Forget the current cart?")
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    manager.clear_cart().context("Failed to clear cart")?;
    ctx.output.success("Cart cleared");
    Ok(())
}

async fn checkout(manager: &Manager, ctx: &Context) -> Result<()> {
    rehydrate(manager, ctx).await?;

    let Some(url) = manager.checkout_url() else {
        bail!("No active cart. Add something with `turbo cart add` first.");
    };
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "checkoutUrl": url }));
    } else {
        println!("{}", url);
    }
    Ok(())
}

fn print_cart(cart: &Cart, status: CartStatus, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(cart);
        return;
    }

    ctx.output.header(&format!("Cart {}", cart.id));
    ctx.output.kv("status", &status_badge(status));
    if let Some(updated_at) = cart.updated_at {
        ctx.output
            .kv("updated", &updated_at.format("%Y-%m-%d %H:%M UTC").to_string());
    }

    if cart.is_empty() {
        ctx.output.info("Cart is empty");
    } else {
        println!();
        let widths = [24, 30, 5, 10];
        ctx.output
            .table_row(&["LINE", "ITEM", "QTY", "TOTAL"], &widths);
        for line in &cart.lines {
            let mut item = format!(
                "{} / {}",
                line.merchandise.product.title, line.merchandise.title
            );
            if line.bundle_parent().is_some() {
                item = format!("↳ {}", item);
            }
            let line_id = truncate(line.id.as_str(), widths[0]);
            let quantity = line.quantity.to_string();
            let total = line.line_total().display();
            ctx.output.table_row(
                &[
                    line_id.as_str(),
                    item.as_str(),
                    quantity.as_str(),
                    total.as_str(),
                ],
                &widths,
            );
        }
        println!();
    }

    ctx.output.kv("items", &cart.total_quantity.to_string());
    ctx.output.kv("subtotal", &cart.cost.subtotal_amount.display());
    if let Some(tax) = cart.cost.total_tax_amount {
        ctx.output.kv("tax", &tax.display());
    }
    ctx.output.kv("total", &cart.cost.total_amount.display());
    ctx.output.kv("checkout", &cart.checkout_url);
}

//! Kit metadata inspection.

use anyhow::{anyhow, Context as _, Result};
use turbo_commerce::Currency;

use super::BundleArgs;
use crate::context::Context;

/// Run the bundle command.
pub async fn run(args: BundleArgs, ctx: &Context) -> Result<()> {
    let currency = Currency::from_code(&args.currency)
        .ok_or_else(|| anyhow!("Unsupported currency: {}", args.currency))?;
    let resolver = ctx.bundle_resolver()?;

    let spinner = ctx
        .output
        .spinner(&format!("Reading kit metadata for {}...", args.handle));
    let descriptor = if args.strict {
        resolver.try_resolve(&args.handle).await
    } else {
        Ok(resolver.resolve(&args.handle).await)
    };
    spinner.finish_and_clear();
    let descriptor =
        descriptor.with_context(|| format!("Failed to read kit metadata for {}", args.handle))?;

    if ctx.output.is_json() {
        ctx.output.json(&descriptor);
        return Ok(());
    }

    if !descriptor.is_bundle {
        ctx.output.info(&format!("{} is not a kit", args.handle));
        return Ok(());
    }

    ctx.output.header(&format!("Kit: {}", args.handle));
    ctx.output.kv(
        "premier",
        if descriptor.includes_premier { "yes" } else { "no" },
    );
    ctx.output
        .kv("components", &descriptor.components.len().to_string());
    for component in &descriptor.components {
        let mut item = format!("{} × {} ({})", component.quantity, component.title, component.handle);
        if let Some(ref variant) = component.variant_title {
            item.push_str(&format!(" [{}]", variant));
        }
        if let Some(ref notes) = component.notes {
            item.push_str(&format!(" - {}", notes));
        }
        ctx.output.list_item(&item);
    }
    ctx.output.kv(
        "retail value",
        &descriptor.aggregate_retail_value(currency).display(),
    );
    if descriptor.expands_on_add() {
        ctx.output.info(&format!(
            "Adding with `turbo cart add <variant> --product {}` also adds each component",
            args.handle
        ));
    }

    Ok(())
}

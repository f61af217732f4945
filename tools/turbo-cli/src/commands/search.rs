//! Catalog search.

use anyhow::{anyhow, Context as _, Result};
use turbo_commerce::search::{FilterDirectives, SearchOptions, SortOption};

use super::SearchArgs;
use crate::context::Context;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let directives = directives(&args);
    let options = options(&args)?;

    if args.dry_run {
        let query = directives.compile();
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "query": query }));
        } else {
            println!("{}", query);
        }
        return Ok(());
    }

    let catalog = ctx.catalog()?;
    let spinner = ctx.output.spinner("Searching catalog...");
    let results = catalog.search(&directives, &options).await;
    spinner.finish_and_clear();
    let results = results.context("Search failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header("Search results");
    ctx.output.kv("query", &results.query);
    ctx.output.kv("sort", options.sort.display_name());

    if results.throttled {
        ctx.output
            .warn("The storefront is throttling requests; try again shortly.");
        return Ok(());
    }
    if results.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }

    println!();
    let widths = [32, 28, 10, 9];
    ctx.output
        .table_row(&["TITLE", "HANDLE", "FROM", "STOCK"], &widths);
    for product in &results.products {
        let price = product
            .min_price()
            .map(|p| p.display())
            .unwrap_or_else(|| "-".to_string());
        let stock = if product.available_for_sale {
            "in stock"
        } else {
            "sold out"
        };
        ctx.output.table_row(
            &[
                product.title.as_str(),
                product.handle.as_str(),
                price.as_str(),
                stock,
            ],
            &widths,
        );
    }

    if let (true, Some(cursor)) = (
        results.page_info.has_next_page,
        results.page_info.end_cursor.as_deref(),
    ) {
        println!();
        ctx.output
            .info(&format!("More results: turbo search ... --after {}", cursor));
    }

    Ok(())
}

fn directives(args: &SearchArgs) -> FilterDirectives {
    let mut directives = FilterDirectives::new().with_price_range(args.min_price, args.max_price);
    if let Some(ref tag) = args.tag {
        directives = directives.with_tag(tag);
    }
    if let Some(ref product_type) = args.product_type {
        directives = directives.with_product_type(product_type);
    }
    if let Some(ref vendor) = args.vendor {
        directives = directives.with_vendor(vendor);
    }
    if let Some(ref text) = args.text {
        directives = directives.with_text(text);
    }
    if args.in_stock {
        directives = directives.with_available(true);
    }
    directives
}

fn options(args: &SearchArgs) -> Result<SearchOptions> {
    let sort = SortOption::from_name(&args.sort)
        .ok_or_else(|| anyhow!("Unknown sort option: {}", args.sort))?;
    let mut options = SearchOptions::new()
        .with_page_size(args.limit)
        .with_sort(sort);
    if let Some(ref cursor) = args.after {
        options = options.with_cursor(cursor);
    }
    Ok(options)
}

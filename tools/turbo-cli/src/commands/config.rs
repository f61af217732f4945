//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { endpoint, force } => init_config(&endpoint, force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[storefront]");
    ctx.output.kv("endpoint", &config.storefront.endpoint);
    if let Some(ref token) = config.storefront.access_token {
        ctx.output.kv("access_token", token);
    }
    ctx.output
        .kv("timeout_secs", &config.storefront.timeout_secs.to_string());

    ctx.output.info("");
    ctx.output.info("[retry]");
    ctx.output
        .kv("max_retries", &config.retry.max_retries.to_string());
    ctx.output
        .kv("base_delay_ms", &config.retry.base_delay_ms.to_string());
    ctx.output
        .kv("max_delay_ms", &config.retry.max_delay_ms.to_string());
    ctx.output.kv("jitter_ms", &config.retry.jitter_ms.to_string());

    ctx.output.info("");
    ctx.output.info("[bundle]");
    ctx.output.kv("namespace", &config.bundle.namespace);
    ctx.output.kv("components_key", &config.bundle.components_key);
    ctx.output.kv("premier_key", &config.bundle.premier_key);

    ctx.output.info("");
    ctx.output.info("[state]");
    ctx.output.kv("path", &ctx.state_path().display().to_string());

    Ok(())
}

fn init_config(endpoint: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("turbo.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(endpoint))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

/// Copy of `config` with the access token masked.
fn redacted(config: &CliConfig) -> CliConfig {
    let mut config = config.clone();
    config.storefront.access_token = config.storefront.access_token.as_deref().map(mask);
    config
}

fn mask(token: &str) -> String {
    let visible: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}

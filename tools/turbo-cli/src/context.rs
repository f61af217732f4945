//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_cache::FileStore;
use turbo_commerce::bundle::BundleResolver;
use turbo_commerce::cart::CartManager;
use turbo_commerce::catalog::Catalog;
use turbo_data::StorefrontClient;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file and environment.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };
        config.apply_env();

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Storefront transport built from the config.
    pub fn client(&self) -> Result<Arc<StorefrontClient>> {
        let config = self.config.storefront_config()?;
        let client = StorefrontClient::new(config).context("Failed to build storefront client")?;
        self.output.debug(&format!("Storefront: {}", client.endpoint()));
        Ok(Arc::new(client))
    }

    /// Catalog over the configured storefront.
    pub fn catalog(&self) -> Result<Catalog<StorefrontClient>> {
        Ok(Catalog::with_metafields(
            self.client()?,
            self.config.bundle.clone(),
        ))
    }

    /// Bundle resolver over the configured storefront.
    pub fn bundle_resolver(&self) -> Result<BundleResolver<StorefrontClient>> {
        Ok(BundleResolver::new(self.catalog()?))
    }

    /// Cart manager persisting its cart id in the state file.
    pub fn cart_manager(&self) -> Result<CartManager<StorefrontClient, FileStore>> {
        let state_path = self.state_path();
        self.output
            .debug(&format!("State file: {}", state_path.display()));
        Ok(CartManager::with_metafields(
            self.client()?,
            FileStore::new(state_path),
            self.config.bundle.clone(),
        ))
    }

    /// Location of the persisted state file.
    pub fn state_path(&self) -> PathBuf {
        self.resolve_path(&self.config.state.path)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

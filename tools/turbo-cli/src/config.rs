//! CLI configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use turbo_commerce::bundle::BundleMetafields;
use turbo_data::{BackoffStrategy, RetryPolicy, StorefrontConfig};

/// Environment variable overriding `storefront.endpoint`.
pub const ENV_STOREFRONT_URL: &str = "TURBO_STOREFRONT_URL";

/// Environment variable overriding `storefront.access_token`.
pub const ENV_STOREFRONT_TOKEN: &str = "TURBO_STOREFRONT_TOKEN";

/// Config file names searched for, nearest directory first.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["turbo.toml", ".turbo.toml", "turbo.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storefront connection.
    #[serde(default)]
    pub storefront: StorefrontSection,

    /// Transport retry behaviour.
    #[serde(default)]
    pub retry: RetrySection,

    /// Where kit metadata lives on products.
    #[serde(default)]
    pub bundle: BundleMetafields,

    /// Local persisted state.
    #[serde(default)]
    pub state: StateSection,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply `TURBO_STOREFRONT_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_STOREFRONT_URL).ok(),
            std::env::var(ENV_STOREFRONT_TOKEN).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|v| !v.trim().is_empty()) {
            self.storefront.endpoint = endpoint;
        }
        if let Some(token) = token.filter(|v| !v.trim().is_empty()) {
            self.storefront.access_token = Some(token);
        }
    }

    /// Client configuration for the storefront transport.
    pub fn storefront_config(&self) -> Result<StorefrontConfig> {
        let endpoint = self.storefront.endpoint.trim();
        if endpoint.is_empty() {
            bail!(
                "No storefront endpoint configured. Set storefront.endpoint or {}.",
                ENV_STOREFRONT_URL
            );
        }

        let mut config = StorefrontConfig::new(endpoint)
            .with_timeout(Duration::from_secs(self.storefront.timeout_secs))
            .with_retry(self.retry.policy());
        if let Some(ref token) = self.storefront.access_token {
            config = config.with_access_token(token);
        }
        Ok(config)
    }
}

/// Storefront connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontSection {
    /// GraphQL endpoint URL.
    #[serde(default)]
    pub endpoint: String,

    /// Public storefront access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for StorefrontSection {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySection {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles per attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Backoff ceiling in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Upper bound of random jitter added to each delay.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_jitter_ms() -> u64 {
    50
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl RetrySection {
    /// The transport retry policy these settings describe.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
            .with_backoff(BackoffStrategy::Exponential {
                base: Duration::from_millis(self.base_delay_ms),
                max: Duration::from_millis(self.max_delay_ms),
            })
            .with_jitter(Duration::from_millis(self.jitter_ms))
    }
}

/// Local state settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSection {
    /// JSON file holding the persisted cart id, relative to the working
    /// directory unless absolute.
    #[serde(default = "default_state_path")]
    pub path: String,
}

fn default_state_path() -> String {
    ".turbo/state.json".to_string()
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

/// Generate a default turbo.toml config file.
pub fn generate_default_config(endpoint: &str) -> String {
    format!(
        r#"# Turbo storefront client configuration

[storefront]
endpoint = "{endpoint}"
# access_token = "public-storefront-token"
timeout_secs = 10

[retry]
max_retries = 3
base_delay_ms = 200
max_delay_ms = 2000
jitter_ms = 50

[bundle]
namespace = "custom"
components_key = "bundle_components"
premier_key = "includes_premier"

[state]
path = ".turbo/state.json"
"#,
        endpoint = endpoint
    )
}

//! Bundle ("kit") metadata.
//!
//! A kit is an ordinary product carrying two metafields: a JSON list of
//! component products and a flag for the premium tier. The resolver turns
//! them into a [`BundleDescriptor`].

mod component;
mod resolver;

use serde::{Deserialize, Serialize};

pub use component::{BundleComponent, BundleDescriptor};
pub use resolver::{BundleError, BundleResolver};
pub(crate) use resolver::resolve_record;

/// Where on the product the bundle metafields live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleMetafields {
    /// Metafield namespace.
    pub namespace: String,
    /// Key of the component list.
    pub components_key: String,
    /// Key of the premium-tier flag.
    pub premier_key: String,
}

impl Default for BundleMetafields {
    fn default() -> Self {
        Self {
            namespace: "custom".to_string(),
            components_key: "bundle_components".to_string(),
            premier_key: "includes_premier".to_string(),
        }
    }
}

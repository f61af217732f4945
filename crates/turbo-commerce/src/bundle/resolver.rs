//! Bundle resolution.

use thiserror::Error;
use tracing::{debug, warn};
use turbo_data::{FetchError, Transport};

use crate::bundle::{BundleComponent, BundleDescriptor};
use crate::catalog::{Catalog, ProductRecord};

/// Why kit metadata could not be read.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The product lookup itself failed.
    #[error("Bundle lookup failed: {0}")]
    Fetch(#[from] FetchError),

    /// The metafields exist but don't describe a valid kit.
    #[error("Malformed bundle metadata on {handle}: {reason}")]
    Malformed { handle: String, reason: String },
}

impl BundleError {
    fn malformed(handle: &str, reason: impl Into<String>) -> Self {
        BundleError::Malformed {
            handle: handle.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reads kit metadata for products.
pub struct BundleResolver<T> {
    catalog: Catalog<T>,
}

impl<T: Transport> BundleResolver<T> {
    /// Create a resolver over a catalog.
    pub fn new(catalog: Catalog<T>) -> Self {
        Self { catalog }
    }

    /// Resolve the kit descriptor for `handle`.
    ///
    /// Plain products (unknown handle, or either metafield unset) resolve to
    /// the default descriptor. Lookup and parse failures are errors.
    pub async fn try_resolve(&self, handle: &str) -> Result<BundleDescriptor, BundleError> {
        match self.catalog.product_record(handle).await? {
            Some(record) => descriptor_from_record(&record),
            None => {
                debug!(handle, "No product for bundle lookup");
                Ok(BundleDescriptor::default())
            }
        }
    }

    /// Like [`try_resolve`](Self::try_resolve), but any failure yields the
    /// default descriptor.
    pub async fn resolve(&self, handle: &str) -> BundleDescriptor {
        or_plain(handle, self.try_resolve(handle).await)
    }
}

/// Fail-safe descriptor for an already-fetched record.
pub(crate) fn resolve_record(record: &ProductRecord) -> BundleDescriptor {
    or_plain(&record.product.handle, descriptor_from_record(record))
}

fn or_plain(handle: &str, result: Result<BundleDescriptor, BundleError>) -> BundleDescriptor {
    result.unwrap_or_else(|e| {
        warn!(handle, error = %e, "Treating product as non-bundle");
        BundleDescriptor::default()
    })
}

pub(crate) fn descriptor_from_record(
    record: &ProductRecord,
) -> Result<BundleDescriptor, BundleError> {
    let handle = record.product.handle.as_str();
    let (Some(components), Some(premier)) = (&record.bundle_components, &record.includes_premier)
    else {
        return Ok(BundleDescriptor::default());
    };

    let components: Vec<BundleComponent> = serde_json::from_str(&components.value)
        .map_err(|e| BundleError::malformed(handle, e.to_string()))?;
    if let Some(bad) = components.iter().find(|c| c.quantity == 0) {
        return Err(BundleError::malformed(
            handle,
            format!("component {} has quantity 0", bad.handle),
        ));
    }
    let includes_premier = parse_flag(&premier.value)
        .ok_or_else(|| BundleError::malformed(handle, format!("bad flag {:?}", premier.value)))?;

    if components.is_empty() {
        return Ok(BundleDescriptor::default());
    }
    Ok(BundleDescriptor {
        is_bundle: true,
        includes_premier,
        components,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

//! Catalog lookups against the storefront.

use std::sync::Arc;

use tracing::{debug, warn};
use turbo_data::{execute, FetchError, Transport};

use crate::bundle::BundleMetafields;
use crate::catalog::queries::{
    ProductByHandle, ProductByHandleVars, SearchProducts, SearchProductsVars,
};
use crate::catalog::{Product, ProductRecord, ProductVariant};
use crate::error::CommerceError;
use crate::search::{FilterDirectives, SearchOptions, SearchResults};

/// Read-only access to the remote product catalog.
pub struct Catalog<T> {
    transport: Arc<T>,
    metafields: BundleMetafields,
}

impl<T> Clone for Catalog<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            metafields: self.metafields.clone(),
        }
    }
}

impl<T: Transport> Catalog<T> {
    /// Create a catalog reading bundle data from the default metafields.
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_metafields(transport, BundleMetafields::default())
    }

    /// Create a catalog reading bundle data from custom metafields.
    pub fn with_metafields(transport: Arc<T>, metafields: BundleMetafields) -> Self {
        Self {
            transport,
            metafields,
        }
    }

    /// The metafield coordinates in use.
    pub fn metafields(&self) -> &BundleMetafields {
        &self.metafields
    }

    /// Fetch a product and its bundle metafields. `Ok(None)` if no product
    /// has that handle.
    pub async fn product_record(&self, handle: &str) -> Result<Option<ProductRecord>, FetchError> {
        let vars = ProductByHandleVars {
            handle: handle.to_string(),
            namespace: self.metafields.namespace.clone(),
            components_key: self.metafields.components_key.clone(),
            premier_key: self.metafields.premier_key.clone(),
        };
        let data = execute::<ProductByHandle, _>(self.transport.as_ref(), &vars).await?;
        debug!(handle, found = data.product.is_some(), "Product lookup");
        Ok(data.product)
    }

    /// Fetch a product by handle.
    pub async fn product(&self, handle: &str) -> Result<Product, CommerceError> {
        self.product_record(handle)
            .await?
            .map(|record| record.product)
            .ok_or_else(|| CommerceError::ProductNotFound(handle.to_string()))
    }

    /// Pick the variant of `handle` to buy. A matching `variant_title` wins;
    /// otherwise the product's default variant is used.
    pub async fn variant_for(
        &self,
        handle: &str,
        variant_title: Option<&str>,
    ) -> Result<(Product, ProductVariant), CommerceError> {
        let product = self.product(handle).await?;
        let variant = variant_title
            .and_then(|title| product.variant_titled(title))
            .or_else(|| product.default_variant())
            .cloned()
            .ok_or_else(|| CommerceError::VariantNotFound(handle.to_string()))?;
        Ok((product, variant))
    }

    /// Run a filtered catalog search. A throttled backend yields an empty
    /// page flagged `throttled` instead of an error.
    pub async fn search(
        &self,
        directives: &FilterDirectives,
        options: &SearchOptions,
    ) -> Result<SearchResults, CommerceError> {
        let query = directives.compile();
        let vars = SearchProductsVars {
            query: query.clone(),
            first: options.first,
            after: options.after.clone(),
            sort_key: options.sort.sort_key().to_string(),
            reverse: options.sort.reverse(),
        };

        match execute::<SearchProducts, _>(self.transport.as_ref(), &vars).await {
            Ok(data) => {
                let products = data.products.items.into_vec();
                debug!(query = %query, count = products.len(), "Search complete");
                Ok(SearchResults {
                    query,
                    products,
                    page_info: data.products.page_info,
                    throttled: false,
                })
            }
            Err(FetchError::RateLimited { retry_after }) => {
                warn!(query = %query, ?retry_after, "Search throttled, returning empty page");
                Ok(SearchResults {
                    throttled: true,
                    ..SearchResults::empty(query)
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

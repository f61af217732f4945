//! Storefront commerce logic for TurboCommerce.
//!
//! This crate sits between a storefront UI and the hosted commerce backend:
//!
//! - **Catalog**: Product lookup and filtered search
//! - **Search**: Compiling facet directives into the catalog query grammar
//! - **Bundle**: Reading kit metadata off products
//! - **Cart**: The remote cart, its observable state and the single-writer
//!   manager that mutates it
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_cache::FileStore;
//! use turbo_commerce::prelude::*;
//! use turbo_data::{StorefrontClient, StorefrontConfig};
//!
//! let client = Arc::new(StorefrontClient::new(StorefrontConfig::new(endpoint))?);
//!
//! // Search the catalog
//! let catalog = Catalog::new(Arc::clone(&client));
//! let filters = FilterDirectives::new().with_tag("kit,skate|surf").with_available(true);
//! let page = catalog.search(&filters, &SearchOptions::new()).await?;
//!
//! // Add a kit and its components to the cart
//! let carts = CartManager::new(client, FileStore::new(".turbo/state.json"));
//! carts.rehydrate().await?;
//! let request = AddToCart::new(variant_id, 1).with_product_handle("starter-kit");
//! let cart = carts.add_product_to_cart(request).await?;
//! println!("Checkout: {}", cart.checkout_url);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod bundle;
pub mod cart;
pub mod catalog;
pub mod connection;
pub mod search;

pub use error::{CommerceError, UserError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, UserError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, Image, Product, ProductRecord, ProductVariant};

    // Bundle
    pub use crate::bundle::{
        BundleComponent, BundleDescriptor, BundleError, BundleMetafields, BundleResolver,
    };

    // Cart
    pub use crate::cart::{AddToCart, Cart, CartLine, CartManager, CartState, CartStatus};

    // Search
    pub use crate::connection::{normalize, Connection};
    pub use crate::search::{FilterDirectives, SearchOptions, SearchResults, SortOption};
}

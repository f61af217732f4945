//! Product catalog module.
//!
//! Product types as the storefront returns them, and the read-only
//! [`Catalog`] used for lookups and filtered search.

mod client;
mod product;
mod queries;

pub use client::Catalog;
pub use product::{Image, Metafield, Product, ProductRecord, ProductVariant};

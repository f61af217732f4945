//! Client-side key-value persistence for TurboCommerce.
//!
//! Holds the small amount of state a storefront client keeps between
//! sessions, most importantly the opaque id of the active cart.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::new(".turbo/state.json"));
//!
//! cache.set("cartId", &cart_id)?;
//! let cart_id: Option<String> = cache.get("cartId")?;
//! cache.delete("cartId")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}

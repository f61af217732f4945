//! Commerce error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turbo_cache::CacheError;
use turbo_data::FetchError;

/// A validation error returned in a mutation payload's `userErrors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Message suitable for showing to the shopper.
    pub message: String,
    /// Machine-readable code.
    #[serde(default)]
    pub code: Option<String>,
}

/// Errors that can occur in storefront commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No purchasable variant could be determined.
    #[error("Variant not found for product: {0}")]
    VariantNotFound(String),

    /// An operation needed a cart but none is active.
    #[error("No active cart")]
    NoActiveCart,

    /// Another cart mutation has not finished yet.
    #[error("A cart update is already in progress")]
    MutationInProgress,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u32, u32),

    /// The backend rejected a mutation.
    #[error("{}", join_user_errors(.0))]
    UserErrors(Vec<UserError>),

    /// A mutation payload came back without a cart.
    #[error("Storefront returned no cart")]
    MissingCart,

    /// A monetary amount could not be parsed.
    #[error("Invalid money amount: {0}")]
    InvalidMoney(String),

    /// Currency code outside the supported set.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Transport or request-level failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Local persistence failure.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl CommerceError {
    /// Whether this is the local single-flight rejection.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, CommerceError::MutationInProgress)
    }

    /// Whether the backend is throttling us.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CommerceError::Fetch(e) if e.is_rate_limited())
    }
}

fn join_user_errors(errors: &[UserError]) -> String {
    if errors.is_empty() {
        return "Cart update rejected".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

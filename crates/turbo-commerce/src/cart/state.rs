//! Shared cart state.
//!
//! [`CartState`] is cheap to clone and can be handed to any number of
//! readers. Only [`CartManager`](crate::cart::CartManager) writes to it, and
//! at most one write operation is in flight at a time.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::CommerceError;

/// Where the cart is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Looking up the persisted cart.
    Loading,
    /// A cart is active.
    Ready,
    /// No cart exists yet.
    Empty,
    /// A mutation is in flight.
    Mutating,
    /// The last operation failed.
    Error,
}

#[derive(Debug)]
struct Snapshot {
    cart: Option<Arc<Cart>>,
    status: CartStatus,
    last_error: Option<String>,
    in_flight: Option<CartStatus>,
}

/// Observable cart state.
#[derive(Debug, Clone)]
pub struct CartState {
    inner: Arc<RwLock<Snapshot>>,
}

impl CartState {
    /// Fresh state, before the persisted cart has been looked up.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                cart: None,
                status: CartStatus::Loading,
                last_error: None,
                in_flight: None,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The last known-good cart.
    pub fn cart(&self) -> Option<Arc<Cart>> {
        self.read().cart.clone()
    }

    /// Current status. While an operation is in flight this reports
    /// `Loading` or `Mutating`.
    pub fn status(&self) -> CartStatus {
        let snapshot = self.read();
        snapshot.in_flight.unwrap_or(snapshot.status)
    }

    /// Whether an operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.read().in_flight.is_some()
    }

    /// Message of the most recent failure, cleared on success.
    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    /// Claim the single in-flight slot, or fail with `MutationInProgress`.
    pub(crate) fn begin(&self, kind: CartStatus) -> Result<OperationGuard, CommerceError> {
        let mut snapshot = self.write();
        if snapshot.in_flight.is_some() {
            return Err(CommerceError::MutationInProgress);
        }
        snapshot.in_flight = Some(kind);
        Ok(OperationGuard {
            state: self.clone(),
        })
    }

    /// Replace the snapshot with a fresh cart.
    pub(crate) fn replace(&self, cart: Cart) -> Arc<Cart> {
        let cart = Arc::new(cart);
        let mut snapshot = self.write();
        snapshot.cart = Some(Arc::clone(&cart));
        snapshot.status = CartStatus::Ready;
        snapshot.last_error = None;
        cart
    }

    /// Forget the cart.
    pub(crate) fn clear(&self) {
        let mut snapshot = self.write();
        snapshot.cart = None;
        snapshot.status = CartStatus::Empty;
        snapshot.last_error = None;
    }

    /// Record a failure, keeping the last known-good cart.
    pub(crate) fn fail(&self, error: &CommerceError) {
        let mut snapshot = self.write();
        snapshot.status = CartStatus::Error;
        snapshot.last_error = Some(error.to_string());
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the in-flight slot; releases it on drop, whatever the exit path.
#[derive(Debug)]
pub(crate) struct OperationGuard {
    state: CartState,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.state.write().in_flight = None;
    }
}

//! Shopping cart module.
//!
//! The remote cart model, the observable [`CartState`] and the
//! [`CartManager`] that performs every cart mutation.

mod cart;
mod manager;
mod queries;
mod state;

pub use cart::{
    Cart, CartCost, CartLine, LineAttribute, LineProduct, Merchandise, ATTR_BUNDLE_PARENT,
    ATTR_INCLUDED_IN, MAX_CART_LINES, MAX_QUANTITY_PER_ITEM,
};
pub use manager::{AddToCart, CartManager, CART_ID_KEY};
pub use state::{CartState, CartStatus};

#[cfg(test)]
pub(crate) use cart::fixtures;

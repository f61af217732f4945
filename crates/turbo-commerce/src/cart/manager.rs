//! Cart mutations.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, warn};
use turbo_cache::{Cache, KvStore};
use turbo_data::{execute, Transport};

use crate::bundle::{resolve_record, BundleComponent, BundleMetafields};
use crate::cart::queries::{
    CartCreate, CartCreateVars, CartInput, CartLineInput, CartLineUpdateInput, CartLinesAdd,
    CartLinesAddVars, CartLinesRemove, CartLinesRemoveVars, CartLinesUpdate, CartLinesUpdateVars,
    CartQuery, CartQueryVars,
};
use crate::cart::{
    Cart, CartState, CartStatus, LineAttribute, ATTR_BUNDLE_PARENT, ATTR_INCLUDED_IN,
    MAX_QUANTITY_PER_ITEM,
};
use crate::catalog::Catalog;
use crate::error::CommerceError;
use crate::ids::{CartId, CartLineId, VariantId};

/// Store key of the persisted cart id.
pub const CART_ID_KEY: &str = "cartId";

/// An add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    /// Variant to add.
    pub variant_id: VariantId,
    /// Units to add.
    pub quantity: u32,
    /// Handle of the variant's product; when set, kit components are
    /// added alongside.
    pub product_handle: Option<String>,
}

impl AddToCart {
    pub fn new(variant_id: impl Into<VariantId>, quantity: u32) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
            product_handle: None,
        }
    }

    pub fn with_product_handle(mut self, handle: impl Into<String>) -> Self {
        self.product_handle = Some(handle.into());
        self
    }
}

/// The only writer of cart state.
///
/// Every operation claims the state's in-flight slot first; a second call
/// while one is running fails with [`CommerceError::MutationInProgress`]
/// without touching the network. Successful mutations replace the cart
/// snapshot with the one the backend returned.
pub struct CartManager<T, S> {
    transport: Arc<T>,
    catalog: Catalog<T>,
    cache: Cache<S>,
    state: CartState,
}

impl<T: Transport, S: KvStore> CartManager<T, S> {
    /// Create a manager with default bundle metafields.
    pub fn new(transport: Arc<T>, store: S) -> Self {
        Self::with_metafields(transport, store, BundleMetafields::default())
    }

    /// Create a manager reading kit data from custom metafields.
    pub fn with_metafields(transport: Arc<T>, store: S, metafields: BundleMetafields) -> Self {
        Self {
            catalog: Catalog::with_metafields(Arc::clone(&transport), metafields),
            transport,
            cache: Cache::new(store),
            state: CartState::new(),
        }
    }

    /// Handle for observing cart state.
    pub fn state(&self) -> CartState {
        self.state.clone()
    }

    /// The last known-good cart.
    pub fn cart(&self) -> Option<Arc<Cart>> {
        self.state.cart()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> CartStatus {
        self.state.status()
    }

    /// Whether an operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Hosted checkout URL of the active cart.
    pub fn checkout_url(&self) -> Option<String> {
        self.state.cart().map(|cart| cart.checkout_url.clone())
    }

    /// Id of the active cart, from the snapshot or the store.
    pub fn cart_id(&self) -> Result<Option<CartId>, CommerceError> {
        if let Some(cart) = self.state.cart() {
            return Ok(Some(cart.id.clone()));
        }
        Ok(self.cache.get(CART_ID_KEY)?)
    }

    /// Load the persisted cart, if any.
    ///
    /// A persisted id the backend no longer knows is forgotten.
    pub async fn rehydrate(&self) -> Result<Option<Arc<Cart>>, CommerceError> {
        let _guard = self.state.begin(CartStatus::Loading)?;

        let Some(id) = self.cache.get::<CartId>(CART_ID_KEY)? else {
            self.state.clear();
            return Ok(None);
        };

        let vars = CartQueryVars { id: id.clone() };
        match execute::<CartQuery, _>(self.transport.as_ref(), &vars).await {
            Ok(data) => match data.cart {
                Some(cart) => {
                    debug!(cart_id = %id, lines = cart.lines.len(), "Cart rehydrated");
                    Ok(Some(self.state.replace(cart)))
                }
                None => {
                    info!(cart_id = %id, "Persisted cart no longer exists");
                    self.forget()?;
                    Ok(None)
                }
            },
            Err(e) => {
                let err = CommerceError::from(e);
                self.state.fail(&err);
                Err(err)
            }
        }
    }

    /// Add `quantity` of a variant.
    pub async fn add_to_cart(
        &self,
        variant_id: impl Into<VariantId>,
        quantity: u32,
    ) -> Result<Arc<Cart>, CommerceError> {
        self.add_product_to_cart(AddToCart::new(variant_id, quantity))
            .await
    }

    /// Add a variant, expanding premium kits into component lines.
    ///
    /// Creates the remote cart first when none exists.
    pub async fn add_product_to_cart(&self, request: AddToCart) -> Result<Arc<Cart>, CommerceError> {
        check_quantity(request.quantity)?;
        let _guard = self.state.begin(CartStatus::Mutating)?;
        let result = self.add_lines(&request).await;
        self.settle(result)
    }

    /// Set a line's quantity. Zero removes the line.
    pub async fn update_line(
        &self,
        line_id: &CartLineId,
        quantity: u32,
    ) -> Result<Arc<Cart>, CommerceError> {
        if quantity == 0 {
            return self.remove_line(line_id).await;
        }
        check_quantity(quantity)?;
        let _guard = self.state.begin(CartStatus::Mutating)?;

        let result = self.update_remote(line_id, quantity).await;
        self.settle(result)
    }

    /// Remove one line. Kit component lines are left in place.
    pub async fn remove_line(&self, line_id: &CartLineId) -> Result<Arc<Cart>, CommerceError> {
        let _guard = self.state.begin(CartStatus::Mutating)?;

        let result = self.remove_remote(line_id).await;
        self.settle(result)
    }

    /// Forget the active cart locally. The remote cart is left to expire.
    pub fn clear_cart(&self) -> Result<(), CommerceError> {
        let _guard = self.state.begin(CartStatus::Mutating)?;
        self.forget()?;
        info!("Cart cleared");
        Ok(())
    }

    fn forget(&self) -> Result<(), CommerceError> {
        self.state.clear();
        self.cache.delete(CART_ID_KEY)?;
        Ok(())
    }

    fn require_cart_id(&self) -> Result<CartId, CommerceError> {
        self.cart_id()?.ok_or(CommerceError::NoActiveCart)
    }

    fn settle(&self, result: Result<Cart, CommerceError>) -> Result<Arc<Cart>, CommerceError> {
        match result {
            Ok(cart) => {
                debug!(cart_id = %cart.id, total_quantity = cart.total_quantity, "Cart updated");
                if cart.has_unlisted_lines() {
                    warn!(cart_id = %cart.id, listed = cart.lines.len(), "Cart snapshot is missing lines");
                }
                Ok(self.state.replace(cart))
            }
            Err(e) => {
                warn!(error = %e, "Cart operation failed");
                self.state.fail(&e);
                Err(e)
            }
        }
    }

    async fn add_lines(&self, request: &AddToCart) -> Result<Cart, CommerceError> {
        let lines = self.lines_for(request).await?;
        let cart_id = match self.cart_id()? {
            Some(id) => id,
            None => self.create_cart().await?,
        };

        debug!(cart_id = %cart_id, lines = lines.len(), "Adding cart lines");
        let vars = CartLinesAddVars { cart_id, lines };
        execute::<CartLinesAdd, _>(self.transport.as_ref(), &vars)
            .await?
            .cart_lines_add
            .into_cart()
    }

    async fn update_remote(&self, line_id: &CartLineId, quantity: u32) -> Result<Cart, CommerceError> {
        let vars = CartLinesUpdateVars {
            cart_id: self.require_cart_id()?,
            lines: vec![CartLineUpdateInput {
                id: line_id.clone(),
                quantity,
            }],
        };
        debug!(line_id = %line_id, quantity, "Updating cart line");
        execute::<CartLinesUpdate, _>(self.transport.as_ref(), &vars)
            .await?
            .cart_lines_update
            .into_cart()
    }

    async fn remove_remote(&self, line_id: &CartLineId) -> Result<Cart, CommerceError> {
        let vars = CartLinesRemoveVars {
            cart_id: self.require_cart_id()?,
            line_ids: vec![line_id.clone()],
        };
        debug!(line_id = %line_id, "Removing cart line");
        execute::<CartLinesRemove, _>(self.transport.as_ref(), &vars)
            .await?
            .cart_lines_remove
            .into_cart()
    }

    async fn create_cart(&self) -> Result<CartId, CommerceError> {
        let vars = CartCreateVars {
            input: CartInput::default(),
        };
        let cart = execute::<CartCreate, _>(self.transport.as_ref(), &vars)
            .await?
            .cart_create
            .into_cart()?;
        let id = cart.id.clone();
        self.cache.set(CART_ID_KEY, &id)?;
        self.state.replace(cart);
        info!(cart_id = %id, "Cart created");
        Ok(id)
    }

    async fn lines_for(&self, request: &AddToCart) -> Result<Vec<CartLineInput>, CommerceError> {
        let parent = CartLineInput {
            merchandise_id: request.variant_id.clone(),
            quantity: request.quantity,
            attributes: Vec::new(),
        };
        let Some(handle) = request.product_handle.as_deref() else {
            return Ok(vec![parent]);
        };

        let record = match self.catalog.product_record(handle).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(vec![parent]),
            Err(e) => {
                warn!(handle, error = %e, "Kit lookup failed, adding as a plain product");
                return Ok(vec![parent]);
            }
        };
        let descriptor = resolve_record(&record);
        if !descriptor.expands_on_add() {
            return Ok(vec![parent]);
        }

        let lookups = descriptor
            .components
            .iter()
            .map(|component| self.component_variant(component));
        // All or nothing: a kit is never partially expanded.
        let variants = match try_join_all(lookups).await {
            Ok(variants) => variants,
            Err(e) => {
                warn!(handle, error = %e, "Kit component lookup failed, adding as a plain product");
                return Ok(vec![parent]);
            }
        };

        let mut lines = Vec::with_capacity(variants.len() + 1);
        lines.push(parent);
        for (component, variant_id) in descriptor.components.iter().zip(variants) {
            let quantity = component
                .quantity
                .checked_mul(request.quantity)
                .ok_or(CommerceError::Overflow)?;
            if quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            lines.push(CartLineInput {
                merchandise_id: variant_id,
                quantity,
                attributes: vec![
                    LineAttribute::new(ATTR_INCLUDED_IN, record.product.title.as_str()),
                    LineAttribute::new(ATTR_BUNDLE_PARENT, request.variant_id.as_str()),
                ],
            });
        }
        debug!(handle, components = lines.len() - 1, "Expanded kit");
        Ok(lines)
    }

    async fn component_variant(&self, component: &BundleComponent) -> Result<VariantId, CommerceError> {
        if let Some(id) = &component.variant_id {
            return Ok(id.clone());
        }
        let (_, variant) = self
            .catalog
            .variant_for(&component.handle, component.variant_title.as_deref())
            .await?;
        Ok(variant.id)
    }
}

fn check_quantity(quantity: u32) -> Result<(), CommerceError> {
    if quantity == 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

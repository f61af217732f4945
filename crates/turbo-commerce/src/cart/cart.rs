//! Cart and line types, as returned by the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Image;
use crate::connection::flatten;
use crate::ids::{CartId, CartLineId, VariantId};
use crate::money::Money;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Lines fetched with each cart snapshot. The cart document requests
/// `lines(first: 100)`; larger carts are reported by
/// [`Cart::has_unlisted_lines`].
pub const MAX_CART_LINES: usize = 100;

/// Line attribute naming the kit a component line belongs to.
pub const ATTR_INCLUDED_IN: &str = "IncludedIn";

/// Line attribute holding the merchandise id of a component's kit line.
pub const ATTR_BUNDLE_PARENT: &str = "BundleParent";

/// A key/value pair attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAttribute {
    pub key: String,
    pub value: String,
}

impl LineAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The product a line's merchandise belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProduct {
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    /// Product images, in display order.
    #[serde(default, deserialize_with = "flatten")]
    pub images: Vec<Image>,
}

impl LineProduct {
    /// The image to show for this product.
    pub fn image(&self) -> Option<&Image> {
        self.featured_image.as_ref().or_else(|| self.images.first())
    }
}

/// The variant a line buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchandise {
    pub id: VariantId,
    pub title: String,
    pub price: Money,
    pub product: LineProduct,
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Backend-assigned line id.
    pub id: CartLineId,
    /// Units on this line.
    pub quantity: u32,
    /// What is being bought.
    pub merchandise: Merchandise,
    /// Line attributes, e.g. kit membership.
    #[serde(default)]
    pub attributes: Vec<LineAttribute>,
}

impl CartLine {
    /// Value of attribute `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Merchandise id of the kit line this component was added with.
    pub fn bundle_parent(&self) -> Option<&str> {
        self.attribute(ATTR_BUNDLE_PARENT)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.merchandise.price.multiply(i64::from(self.quantity))
    }
}

/// Backend-computed cart totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

/// A remote cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Opaque cart id.
    pub id: CartId,
    /// Hosted checkout redirect.
    pub checkout_url: String,
    /// Sum of line quantities.
    #[serde(default)]
    pub total_quantity: u32,
    /// Last modification time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Totals.
    pub cost: CartCost,
    /// Lines, in backend order.
    #[serde(default, deserialize_with = "flatten")]
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Find a line by id.
    pub fn line(&self, id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Component lines added with the kit line for `parent`.
    pub fn components_of<'a>(&'a self, parent: &'a VariantId) -> impl Iterator<Item = &'a CartLine> {
        self.lines
            .iter()
            .filter(move |l| l.bundle_parent() == Some(parent.as_str()))
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the snapshot holds fewer units than `total_quantity`, which
    /// happens once a cart grows past [`MAX_CART_LINES`] lines.
    pub fn has_unlisted_lines(&self) -> bool {
        let listed: u64 = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
        listed < u64::from(self.total_quantity)
    }
}

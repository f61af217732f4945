//! Product and variant types.

use serde::{Deserialize, Serialize};

use crate::connection::flatten;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text.
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Merchandise id used when adding to a cart.
    pub id: VariantId,
    /// Variant name (e.g., "Large / Blue").
    pub title: String,
    /// Whether the variant can currently be bought.
    #[serde(default)]
    pub available_for_sale: bool,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Unit price.
    pub price: Money,
}

/// A product in the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL-friendly handle (unique).
    pub handle: String,
    /// Vendor name.
    #[serde(default)]
    pub vendor: Option<String>,
    /// Merchant-defined product type.
    #[serde(default)]
    pub product_type: Option<String>,
    /// Tags for filtering/search.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether any variant can be bought.
    #[serde(default)]
    pub available_for_sale: bool,
    /// Product images, in display order.
    #[serde(default, deserialize_with = "flatten")]
    pub images: Vec<Image>,
    /// Product variants, in display order.
    #[serde(default, deserialize_with = "flatten")]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// First image, if any.
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }

    /// The variant to add when the shopper didn't pick one: the first
    /// available variant, falling back to the first variant.
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Variant whose title matches `title`, ignoring case.
    pub fn variant_titled(&self, title: &str) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.title.eq_ignore_ascii_case(title.trim()))
    }

    /// Lowest variant price.
    pub fn min_price(&self) -> Option<Money> {
        self.variants
            .iter()
            .map(|v| v.price)
            .min_by_key(|p| p.amount_cents)
    }
}

/// A metafield value as stored on the remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    /// Raw serialized value.
    pub value: String,
}

/// A product together with the bundle metafields read alongside it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// The product itself.
    #[serde(flatten)]
    pub product: Product,
    /// Serialized component list.
    #[serde(default)]
    pub bundle_components: Option<Metafield>,
    /// Premium tier flag.
    #[serde(default)]
    pub includes_premier: Option<Metafield>,
}

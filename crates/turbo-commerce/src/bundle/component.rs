//! Bundle component and descriptor types.

use serde::{Deserialize, Serialize};

use crate::ids::VariantId;
use crate::money::{Currency, Money};

/// One product included in a kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleComponent {
    /// Display title.
    pub title: String,
    /// Handle of the component product.
    pub handle: String,
    /// Units of this component per kit.
    pub quantity: u32,
    /// Free-form merchant notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Standalone retail price, as a decimal amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<f64>,
    /// Title of the variant to add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_title: Option<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Explicit merchandise id; skips the variant lookup when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
}

impl BundleComponent {
    /// Retail value of this component at its kit quantity. Missing or
    /// non-finite prices count as zero.
    pub fn retail_value(&self, currency: Currency) -> Money {
        match self.retail_price.filter(|p| p.is_finite()) {
            Some(price) => Money::from_decimal(price, currency).multiply(i64::from(self.quantity)),
            None => Money::zero(currency),
        }
    }
}

/// What the catalog says about a product's kit status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Whether the product is a kit with at least one component.
    pub is_bundle: bool,
    /// Whether the kit includes the premium tier.
    pub includes_premier: bool,
    /// Kit contents, in merchant order.
    pub components: Vec<BundleComponent>,
}

impl BundleDescriptor {
    /// Whether adding the product should also add its components.
    pub fn expands_on_add(&self) -> bool {
        self.is_bundle && self.includes_premier && !self.components.is_empty()
    }

    /// Sum of component retail values.
    pub fn aggregate_retail_value(&self, currency: Currency) -> Money {
        let cents = self
            .components
            .iter()
            .map(|c| c.retail_value(currency).amount_cents)
            .fold(0_i64, i64::saturating_add);
        Money::new(cents, currency)
    }
}

//! Facet directives and their compilation into a catalog query string.

use serde::{Deserialize, Serialize};

use crate::search::expr::{parse_tags, CmpOp, Expr};

/// Fields matched by free-text search, in clause order.
pub const TEXT_FIELDS: [&str; 5] = ["title", "sku", "vendor", "product_type", "tag"];

/// Clause used when no directive is set: only items with stock on hand.
pub const DEFAULT_CLAUSE: &str = "inventory_total:>=1";

/// Caller-supplied facet values. Every field is optional; empty or
/// whitespace-only strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDirectives {
    /// Tag directive (`a,b|c` grammar).
    #[serde(default)]
    pub tag: Option<String>,
    /// Product type.
    #[serde(default)]
    pub product_type: Option<String>,
    /// Vendor.
    #[serde(default)]
    pub vendor: Option<String>,
    /// Availability flag.
    #[serde(default)]
    pub available: Option<bool>,
    /// Free-text query.
    #[serde(default)]
    pub text: Option<String>,
    /// Minimum variant price.
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Maximum variant price.
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl FilterDirectives {
    /// Create an empty directive set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag directive.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the product type.
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Set the vendor.
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Set the availability flag.
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Set the free-text query.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the price range.
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Build the expression tree, or `None` when every directive is empty.
    pub fn to_expr(&self) -> Option<Expr> {
        let mut clauses = Vec::new();

        if let Some(tag) = non_empty(&self.tag).and_then(|t| parse_tags("tag", t)) {
            clauses.push(tag);
        }
        if let Some(product_type) = non_empty(&self.product_type) {
            clauses.push(Expr::eq("product_type", product_type.trim()));
        }
        if let Some(vendor) = non_empty(&self.vendor) {
            clauses.push(Expr::eq("vendor", vendor.trim()));
        }
        if let Some(available) = self.available {
            clauses.push(Expr::Flag {
                field: "available_for_sale",
                value: available,
            });
        }
        if let Some(text) = self.text.as_deref().and_then(sanitize_text) {
            clauses.push(Expr::or(
                TEXT_FIELDS
                    .iter()
                    .map(|&field| Expr::Prefix {
                        field,
                        value: text.clone(),
                    })
                    .collect(),
            ));
        }
        if let Some(min) = finite(self.min_price) {
            clauses.push(price_clause(CmpOp::Gte, min));
        }
        if let Some(max) = finite(self.max_price) {
            clauses.push(price_clause(CmpOp::Lte, max));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(Expr::and(clauses))
        }
    }

    /// Compile to the catalog query string.
    pub fn compile(&self) -> String {
        compile(self)
    }
}

/// Compile directives into one deterministic query string.
///
/// Identical input always yields byte-identical output. With every
/// directive empty the result is [`DEFAULT_CLAUSE`], so an unfiltered
/// browse never lists unsellable items.
pub fn compile(directives: &FilterDirectives) -> String {
    match directives.to_expr() {
        Some(expr) => expr.to_string(),
        None => DEFAULT_CLAUSE.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn price_clause(op: CmpOp, value: f64) -> Expr {
    Expr::Cmp {
        field: "variants.price",
        op,
        value: value.to_string(),
    }
}

/// Strip quote characters and collapse whitespace. The result is escaped
/// again when rendered as a prefix term.
fn sanitize_text(text: &str) -> Option<String> {
    let stripped: String = text.chars().filter(|c| !matches!(c, '"' | '\'')).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

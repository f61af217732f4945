//! Search results.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Cursor pagination info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page exists.
    #[serde(default)]
    pub has_next_page: bool,
    /// Cursor of the last item on this page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of catalog search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The compiled query that produced this page.
    pub query: String,
    /// Matching products, in backend order.
    pub products: Vec<Product>,
    /// Pagination info.
    pub page_info: PageInfo,
    /// Set when the backend throttled the request and the page was
    /// substituted with an empty one.
    pub throttled: bool,
}

impl SearchResults {
    /// An empty page for `query`.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Number of products on this page.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

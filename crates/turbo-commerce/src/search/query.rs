//! Search request options.

use serde::{Deserialize, Serialize};

/// Largest page the storefront serves.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Sort by relevance (default for text search).
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by newest first.
    Newest,
    /// Sort by best selling.
    BestSelling,
}

impl SortOption {
    /// Storefront `ProductSortKeys` value.
    pub fn sort_key(&self) -> &'static str {
        match self {
            SortOption::Relevance => "RELEVANCE",
            SortOption::PriceAsc | SortOption::PriceDesc => "PRICE",
            SortOption::NameAsc | SortOption::NameDesc => "TITLE",
            SortOption::Newest => "CREATED_AT",
            SortOption::BestSelling => "BEST_SELLING",
        }
    }

    /// Whether the sort key is applied in reverse.
    pub fn reverse(&self) -> bool {
        matches!(
            self,
            SortOption::PriceDesc | SortOption::NameDesc | SortOption::Newest
        )
    }

    /// Parse a CLI-style name (`price-asc`, `newest`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "relevance" => Some(SortOption::Relevance),
            "price-asc" => Some(SortOption::PriceAsc),
            "price-desc" => Some(SortOption::PriceDesc),
            "name-asc" => Some(SortOption::NameAsc),
            "name-desc" => Some(SortOption::NameDesc),
            "newest" => Some(SortOption::Newest),
            "best-selling" => Some(SortOption::BestSelling),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::Newest => "Newest",
            SortOption::BestSelling => "Best Selling",
        }
    }
}

/// Paging and ordering for a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Items per page.
    pub first: u32,
    /// Cursor to continue after.
    pub after: Option<String>,
    /// Sort option.
    pub sort: SortOption,
}

impl SearchOptions {
    /// Create default options (24 per page, relevance).
    pub fn new() -> Self {
        Self {
            first: 24,
            after: None,
            sort: SortOption::Relevance,
        }
    }

    /// Set page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, first: u32) -> Self {
        self.first = first.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Continue after a cursor.
    pub fn with_cursor(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = SearchOptions::new()
            .with_page_size(1000)
            .with_sort(SortOption::PriceDesc)
            .with_cursor("abc");
        assert_eq!(options.first, MAX_PAGE_SIZE);
        assert_eq!(options.after.as_deref(), Some("abc"));
        assert_eq!(options.sort.sort_key(), "PRICE");
        assert!(options.sort.reverse());
        assert_eq!(SearchOptions::new().with_page_size(0).first, 1);
    }

    #[test]
    fn test_sort_names() {
        assert_eq!(SortOption::from_name("Price-Asc"), Some(SortOption::PriceAsc));
        assert_eq!(SortOption::from_name("bogus"), None);
        assert!(!SortOption::PriceAsc.reverse());
    }
}

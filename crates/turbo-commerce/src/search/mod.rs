//! Search module.
//!
//! Compiles facet directives into the catalog's boolean query grammar and
//! describes search paging and results.

mod expr;
mod filter;
mod query;
mod results;

pub use expr::{parse_tags, CmpOp, Expr};
pub use filter::{compile, FilterDirectives, DEFAULT_CLAUSE, TEXT_FIELDS};
pub use query::{SearchOptions, SortOption, MAX_PAGE_SIZE};
pub use results::{PageInfo, SearchResults};

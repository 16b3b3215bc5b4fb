//! Course catalog: record types, query contract, HTTP client, and debounced search.

mod client;
mod error;
mod query;
mod search;
mod types;

pub use client::{CatalogClient, CatalogSource};
pub use error::{CatalogError, ErrorBody};
pub use query::{
    page_count, CatalogPage, CatalogQuery, CatalogService, RawCatalogParams, RetryPolicy,
    DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
};
pub use search::{SearchConfig, SearchDebouncer, SearchState};
pub use types::*;

//! Query parameter parsing for list operations
//!
//! This module provides the three parsers behind the fetch-many operation:
//!
//! - [`Filter`]: converts requested filters into a structured
//!   field → operator → value mapping driven by [`FilterDefinition`]s
//! - [`Sort`]: validates the sort field against an allow-list and
//!   normalizes the direction
//! - [`Paging`]: validates and normalizes page number/size against
//!   defaults and a maximum bound
//!
//! Each parser is independent and usable outside the built-in operation
//! variants.
//!
//! # Example
//!
//! ```rust
//! use portico_service::query::{Filter, Paging, Sort};
//! use serde_json::json;
//!
//! let filter = Filter::new(vec!["status".into()]).unwrap();
//! let sort = Sort::new(["name"]);
//! let paging = Paging::default();
//!
//! let sort_params = sort.parse(Some("name"), Some("desc")).unwrap();
//! let paging_params = paging.parse(Some(&json!("2")), None).unwrap();
//! assert_eq!(paging_params.page_number, 2);
//! assert!(sort_params.is_some());
//! ```

mod filter;
mod paging;
mod sort;

pub use filter::{
    Filter, FilterClauses, FilterDefinition, FilterOperator, InternalName, ParsedFilters,
};
pub use paging::{Paging, PagingParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use sort::{Sort, SortCriteria, SortParams};

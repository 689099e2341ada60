//! Paging parameter parsing
//!
//! Validates and normalizes page number and page size against configured
//! defaults and a maximum bound. Values arrive from the query string either
//! as integers or as digit strings; both normalize to integers.
//!
//! # Example
//!
//! ```rust
//! use portico_service::query::Paging;
//! use serde_json::json;
//!
//! let paging = Paging::default();
//!
//! let params = paging.parse(Some(&json!("2")), Some(&json!("50"))).unwrap();
//! assert_eq!(params.page_number, 2);
//! assert_eq!(params.page_size, 50);
//!
//! let params = paging.parse(None, None).unwrap();
//! assert_eq!(params.page_number, 1);
//! assert_eq!(params.page_size, 10);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PagingError;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum number of records per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Parsed paging parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingParams {
    /// 1-indexed page number
    pub page_number: u64,
    /// Number of records per page, within `[1, max_page_size]`
    pub page_size: u64,
}

/// Paging parameter parser
///
/// # Example
///
/// ```rust
/// use portico_service::query::Paging;
/// use serde_json::json;
///
/// // Cap page size at 25, default to 5 when unspecified.
/// let paging = Paging::new(5, 25);
/// assert_eq!(paging.parse(None, None).unwrap().page_size, 5);
/// assert!(paging.parse(None, Some(&json!(26))).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    default_page_size: u64,
    max_page_size: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Paging {
    /// Create a parser with the given default and maximum page sizes
    #[must_use]
    pub const fn new(default_page_size: u64, max_page_size: u64) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }

    /// Parse the requested page number and page size
    ///
    /// Both accept positive integers or all-digit strings; omitted values
    /// default to page 1 and the configured default size.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError`] for non-numeric strings, floats, zero, and
    /// negative values, with the offending value embedded in the message, and
    /// for sizes above the configured maximum.
    pub fn parse(
        &self,
        requested_page: Option<&Value>,
        requested_size: Option<&Value>,
    ) -> Result<PagingParams, PagingError> {
        let page_number = match requested_page {
            Some(page) => parse_positive(page)
                .ok_or_else(|| PagingError::new(format!("Invalid page number {page}")))?,
            None => 1,
        };

        let page_size = match requested_size {
            Some(size) => parse_positive(size)
                .filter(|parsed| *parsed <= self.max_page_size)
                .ok_or_else(|| PagingError::new(format!("Invalid page size {size}")))?,
            None => self.default_page_size,
        };

        Ok(PagingParams {
            page_number,
            page_size,
        })
    }
}

/// Accept a positive integer or an all-digit string encoding one.
fn parse_positive(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().filter(|parsed| *parsed >= 1),
        Value::String(digits)
            if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) =>
        {
            digits.parse().ok().filter(|parsed: &u64| *parsed >= 1)
        }
        _ => None,
    }
}

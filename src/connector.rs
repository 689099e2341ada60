//! Data-access collaborator contract
//!
//! The framework never talks to storage itself; each operation variant
//! delegates to a caller-supplied [`DataConnector`]. The trait models a
//! capability set rather than a mandatory interface: every method has a
//! default implementation that fails with a [`ConfigurationError`], so a
//! connector implements only the operations it supports and a variant wired
//! against a missing capability surfaces integrator misconfiguration instead
//! of attempting a data operation.
//!
//! # Example
//!
//! ```rust
//! use portico_service::connector::{DataConnector, FetchParams};
//! use portico_service::error::HandlerResult;
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
//!
//! struct UserStore;
//!
//! #[async_trait]
//! impl DataConnector for UserStore {
//!     async fn get(&self, params: FetchParams) -> HandlerResult<Vec<Value>> {
//!         let _ = params.page_size;
//!         Ok(vec![json!({"id": 1, "name": "Alice"})])
//!     }
//!     // get_one / insert_one / update_one fall back to configuration errors
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigurationError, HandlerResult};
use crate::query::{ParsedFilters, SortCriteria, DEFAULT_PAGE_SIZE};

/// Parameters handed to [`DataConnector::get`] by the fetch-many variant
///
/// Combines the outputs of the filter, sort, and paging parsers. Serializes
/// with `camelCase` keys, matching the query-string vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    /// Field to sort by, when a sort was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction, when a sort was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_criteria: Option<SortCriteria>,
    /// 1-indexed page number
    pub page_number: u64,
    /// Number of records per page
    pub page_size: u64,
    /// Structured filters: field → operator → value
    pub filters: ParsedFilters,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            sort_by: None,
            sort_criteria: None,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filters: ParsedFilters::new(),
        }
    }
}

/// Duck-typed data-access collaborator
///
/// Implement the subset of methods your endpoints need. Records and bodies
/// are [`serde_json::Value`]: the framework passes data through without
/// imposing a schema.
#[async_trait]
pub trait DataConnector: Send + Sync {
    /// Fetch a page of records matching the given parameters
    async fn get(&self, params: FetchParams) -> HandlerResult<Vec<Value>> {
        let _ = params;
        Err(ConfigurationError::unsupported_operation("get").into())
    }

    /// Fetch a single record by id, `None` when absent
    async fn get_one(&self, id: &str) -> HandlerResult<Option<Value>> {
        let _ = id;
        Err(ConfigurationError::unsupported_operation("get_one").into())
    }

    /// Insert a record, returning its generated id (`None` signals failure)
    async fn insert_one(&self, data: Value) -> HandlerResult<Option<Value>> {
        let _ = data;
        Err(ConfigurationError::unsupported_operation("insert_one").into())
    }

    /// Update the record with the given id, returning the affected count
    async fn update_one(&self, id: &str, data: Value) -> HandlerResult<u64> {
        let _ = (id, data);
        Err(ConfigurationError::unsupported_operation("update_one").into())
    }
}

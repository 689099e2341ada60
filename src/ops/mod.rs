//! Operation variants for the standard CRUD endpoints
//!
//! An [`Operation`] is a strategy object the lifecycle orchestrator drives:
//! optional validation hooks followed by a mandatory `process` step. The four
//! built-in variants cover the usual gateway endpoints:
//!
//! - [`GetMany`]: fetch a filtered, sorted, paged list
//! - [`GetOne`]: fetch a single record by path id
//! - [`CreateOne`]: insert a record from the request body
//! - [`UpdateOne`]: update the record addressed by the path id
//!
//! Variants are configured by composition (builder methods supply the data
//! connector and optional hooks) rather than by subclassing a request type.
//! Each hook is resolved once when the variant is built; at request time the
//! variant only checks `Option`s.
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_service::ops::GetMany;
//! use portico_service::handler::ApiHandler;
//!
//! let operation = GetMany::new()
//!     .with_connector(UserStore::new())
//!     .with_filters_definition(vec!["status".into()])
//!     .with_sortable_fields(["name", "created_at"]);
//!
//! let handler = ApiHandler::new(operation);
//! let response = handler.handle(event).await?;
//! ```

mod create_one;
mod get_many;
mod get_one;
mod update_one;

pub use create_one::CreateOne;
pub use get_many::GetMany;
pub use get_one::GetOne;
pub use update_one::UpdateOne;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::api::ApiContext;
use crate::error::HandlerResult;

/// Async hook transforming a single record
pub(crate) type RecordHook =
    Box<dyn Fn(Value) -> BoxFuture<'static, HandlerResult<Value>> + Send + Sync>;

/// Async hook transforming the whole result list
pub(crate) type RecordsHook =
    Box<dyn Fn(Vec<Value>) -> BoxFuture<'static, HandlerResult<Vec<Value>>> + Send + Sync>;

/// Synchronous request-body validator
pub(crate) type BodyValidator = Box<dyn Fn(&Value) -> HandlerResult<()> + Send + Sync>;

/// Async hook invoked after a successful insert with the generated id
pub(crate) type InsertedHook =
    Box<dyn Fn(Value) -> BoxFuture<'static, HandlerResult<()>> + Send + Sync>;

/// Async hook invoked after a successful update with `(id, data)`
pub(crate) type UpdatedHook =
    Box<dyn Fn(String, Value) -> BoxFuture<'static, HandlerResult<()>> + Send + Sync>;

/// A processing strategy driven by the lifecycle orchestrator
///
/// The three validation hooks default to no-ops; a variant overrides the ones
/// it needs. `process` is mandatory. All steps receive the mutable
/// [`ApiContext`] and run strictly in sequence; see [`crate::handler`] for
/// the failure-to-response mapping.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Validate request data (query parameters, body) before processing
    async fn validate_data(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Validate request headers before processing
    async fn validate_headers(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Generic validation step, runs after the data and header validators
    async fn validate(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Perform the operation and populate the response on the context
    async fn process(&self, ctx: &mut ApiContext) -> HandlerResult<()>;
}

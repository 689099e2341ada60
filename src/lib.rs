//! # portico-service
//!
//! Request-handling scaffold for cloud API gateway events. A configured
//! operation variant plus a data connector turn one inbound gateway event
//! into one outbound response, with the usual CRUD plumbing handled for you.
//!
//! ## Features
//!
//! - **Operation variants**: fetch-many, fetch-one, create-one, update-one,
//!   each configured by composition (connector + optional async hooks)
//! - **Query parsing**: declarative filter definitions (operators, renames,
//!   value mapping), sort-field allow-lists, bounded paging defaults
//! - **Request model**: lazily-computed cached views of the inbound event
//!   (lowercased headers, structured query string, parsed JSON body,
//!   authorizer claims and scopes)
//! - **Lifecycle orchestration**: validation hooks then processing, with
//!   client failures mapped to `{"message": ...}` responses and server
//!   failures propagated to the boundary layer
//!
//! ## Example
//!
//! ```rust,ignore
//! use portico_service::prelude::*;
//!
//! let handler = ApiHandler::new(
//!     GetMany::new()
//!         .with_connector(ProductStore::new(pool))
//!         .with_filters_definition(vec![
//!             "status".into(),
//!             FilterDefinition::new("minPrice")
//!                 .with_internal_name("price")
//!                 .with_operator(FilterOperator::GreaterOrEqual),
//!         ])
//!         .with_sortable_fields(["name", "price"]),
//! );
//!
//! let response = handler.handle(event).await?;
//! ```

pub mod api;
pub mod connector;
pub mod error;
pub mod event;
pub mod handler;
pub mod ops;
pub mod query;

/// Common imports for building handlers
pub mod prelude {
    pub use crate::api::ApiContext;
    pub use crate::connector::{DataConnector, FetchParams};
    pub use crate::error::{HandlerError, HandlerResult};
    pub use crate::event::{GatewayEvent, GatewayResponse};
    pub use crate::handler::{handle, ApiHandler};
    pub use crate::ops::{CreateOne, GetMany, GetOne, Operation, UpdateOne};
    pub use crate::query::{
        Filter, FilterDefinition, FilterOperator, Paging, PagingParams, Sort, SortCriteria,
        SortParams,
    };

    pub use async_trait::async_trait;
}

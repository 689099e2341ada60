//! Request/response model
//!
//! [`ApiContext`] wraps one inbound [`GatewayEvent`] and accumulates the
//! outbound response while the request moves through the lifecycle. Derived
//! request views (lowercased headers, structured query string, parsed JSON
//! body) are computed on first access and cached for the lifetime of the
//! context; the inbound event is immutable, so they are never recomputed.
//!
//! A fresh context is constructed per invocation; nothing is shared across
//! requests.
//!
//! # Example
//!
//! ```rust
//! use portico_service::api::ApiContext;
//! use portico_service::event::GatewayEvent;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let mut ctx = ApiContext::new(GatewayEvent::default());
//! ctx.set_status_code(StatusCode::CREATED);
//! ctx.set_body(json!({"id": 10}));
//!
//! let response = ctx.into_response();
//! assert_eq!(response.status_code, 201);
//! assert_eq!(response.headers["content-type"], "application/json");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use http::{Extensions, StatusCode};
use serde_json::{Map, Value};

use crate::error::{HandlerError, HandlerResult};
use crate::event::{structure_query, GatewayEvent, GatewayResponse};

/// Header identifying the framework on every successful response
pub const POWERED_BY_HEADER: &str = "x-powered-by";

/// Value of the framework marker header
pub const POWERED_BY: &str = "portico-service";

const CONTENT_TYPE_HEADER: &str = "content-type";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Per-request context: cached inbound views plus the response under
/// construction
pub struct ApiContext {
    request: GatewayEvent,
    mapped_headers: OnceLock<HashMap<String, String>>,
    structured_query: OnceLock<Map<String, Value>>,
    parsed_body: OnceLock<Option<Value>>,
    extensions: Extensions,
    status_code: Option<StatusCode>,
    response_headers: BTreeMap<String, String>,
    response_body: Option<Value>,
}

impl ApiContext {
    /// Wrap an inbound gateway event
    ///
    /// The response header map starts with a JSON content type and the
    /// framework marker; both can be overridden via [`set_headers`].
    ///
    /// [`set_headers`]: ApiContext::set_headers
    #[must_use]
    pub fn new(request: GatewayEvent) -> Self {
        let response_headers = BTreeMap::from([
            (CONTENT_TYPE_HEADER.to_string(), CONTENT_TYPE_JSON.to_string()),
            (POWERED_BY_HEADER.to_string(), POWERED_BY.to_string()),
        ]);

        Self {
            request,
            mapped_headers: OnceLock::new(),
            structured_query: OnceLock::new(),
            parsed_body: OnceLock::new(),
            extensions: Extensions::new(),
            status_code: None,
            response_headers,
            response_body: None,
        }
    }

    /// Raw request headers in their original casing
    #[must_use]
    pub fn raw_headers(&self) -> &HashMap<String, String> {
        &self.request.headers
    }

    /// Request headers folded to lowercase keys, computed once
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        self.mapped_headers.get_or_init(|| {
            self.request
                .headers
                .iter()
                .map(|(name, value)| (name.to_lowercase(), value.clone()))
                .collect()
        })
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(&name.to_lowercase()).map(String::as_str)
    }

    /// Structured query string view, computed once
    ///
    /// Bracketed keys become nested values; see [`crate::event`].
    #[must_use]
    pub fn query(&self) -> &Map<String, Value> {
        self.structured_query.get_or_init(|| {
            self.request
                .query_string_parameters
                .as_ref()
                .map(structure_query)
                .unwrap_or_default()
        })
    }

    /// Parsed JSON body, computed once
    ///
    /// Returns `Ok(None)` when the event carries no body.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Body`] when the raw body is not valid JSON.
    pub fn body(&self) -> HandlerResult<Option<&Value>> {
        if self.parsed_body.get().is_none() {
            let parsed = match self.request.body.as_deref() {
                Some(raw) => Some(
                    serde_json::from_str(raw)
                        .map_err(|source| HandlerError::Body(source.to_string()))?,
                ),
                None => None,
            };
            let _ = self.parsed_body.set(parsed);
        }

        Ok(self.parsed_body.get().and_then(Option::as_ref))
    }

    /// Path parameters extracted by the gateway route
    #[must_use]
    pub fn path_parameters(&self) -> Option<&HashMap<String, String>> {
        self.request.path_parameters.as_ref()
    }

    /// Look up a single path parameter
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_parameters()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// Authorizer claims forwarded by the gateway
    #[must_use]
    pub fn authorizer_claims(&self) -> Option<&Map<String, Value>> {
        self.request
            .authorizer
            .as_ref()
            .map(|authorizer| &authorizer.claims)
    }

    /// Authorizer scopes: the `scope` claim, falling back to `scp`
    ///
    /// The first claim holding a non-empty string wins.
    #[must_use]
    pub fn authorizer_scopes(&self) -> Option<&str> {
        let claims = self.authorizer_claims()?;
        ["scope", "scp"].into_iter().find_map(|claim| {
            claims
                .get(claim)
                .and_then(Value::as_str)
                .filter(|scopes| !scopes.is_empty())
        })
    }

    /// Typed per-request state handed between lifecycle steps
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the per-request state
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Explicitly set the response status code
    pub fn set_status_code(&mut self, status_code: StatusCode) {
        self.status_code = Some(status_code);
    }

    /// The explicitly set status code, if any
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    /// Merge headers into the response (shallow merge, later keys win)
    ///
    /// Headers are kept key-ordered so identical responses serialize
    /// identically.
    pub fn set_headers(&mut self, headers: BTreeMap<String, String>) {
        self.response_headers.extend(headers);
    }

    /// Replace the response body wholesale
    pub fn set_body(&mut self, body: Value) {
        self.response_body = Some(body);
    }

    /// Finalize the outbound response
    ///
    /// Status defaults to 200 when never explicitly set. The body is emitted
    /// as-is; encoding it for the wire belongs to the boundary layer.
    #[must_use]
    pub fn into_response(self) -> GatewayResponse {
        GatewayResponse {
            status_code: self.status_code.unwrap_or(StatusCode::OK).as_u16(),
            headers: self.response_headers,
            body: self.response_body,
        }
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("request", &self.request)
            .field("status_code", &self.status_code)
            .field("response_headers", &self.response_headers)
            .field("response_body", &self.response_body)
            .finish_non_exhaustive()
    }
}

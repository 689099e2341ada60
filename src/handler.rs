//! Lifecycle orchestrator
//!
//! [`handle`] drives one [`Operation`] through the request lifecycle: the
//! three validation hooks in order, then `process`. Failures map to responses
//! by phase and status:
//!
//! - a validator failure short-circuits into a client response with the
//!   context's explicit status code (400 when never set) and a
//!   `{"message": ...}` body
//! - a `process` failure with a status below 500 (500 when never set) maps the
//!   same way
//! - a `process` failure at 500 or above propagates as an error for the
//!   boundary layer to surface
//!
//! [`ApiHandler`] is the owned form of the same thing, convenient for wiring
//! one configured operation into a runtime entry point.

use std::collections::BTreeMap;

use http::StatusCode;
use serde_json::json;
use tracing::{debug, error};

use crate::api::ApiContext;
use crate::error::{HandlerError, HandlerResult};
use crate::event::{GatewayEvent, GatewayResponse};
use crate::ops::Operation;

/// Run one gateway event through an operation's lifecycle
///
/// # Errors
///
/// Returns the underlying [`HandlerError`] only for server-side failures
/// (status 500 and above). Client-side failures become `Ok` responses.
pub async fn handle<O>(operation: &O, event: GatewayEvent) -> HandlerResult<GatewayResponse>
where
    O: Operation + ?Sized,
{
    let mut ctx = ApiContext::new(event);

    if let Err(failure) = run_validators(operation, &mut ctx).await {
        let status = ctx.status_code().unwrap_or(StatusCode::BAD_REQUEST);
        debug!(status = status.as_u16(), %failure, "request failed validation");
        return Ok(client_error(status, &failure));
    }

    if let Err(failure) = operation.process(&mut ctx).await {
        let status = ctx.status_code().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.as_u16() >= 500 {
            error!(status = status.as_u16(), %failure, "request processing failed");
            return Err(failure);
        }
        debug!(status = status.as_u16(), %failure, "request rejected during processing");
        return Ok(client_error(status, &failure));
    }

    Ok(ctx.into_response())
}

async fn run_validators<O>(operation: &O, ctx: &mut ApiContext) -> HandlerResult<()>
where
    O: Operation + ?Sized,
{
    operation.validate_data(ctx).await?;
    operation.validate_headers(ctx).await?;
    operation.validate(ctx).await
}

fn client_error(status: StatusCode, failure: &HandlerError) -> GatewayResponse {
    GatewayResponse {
        status_code: status.as_u16(),
        headers: BTreeMap::new(),
        body: Some(json!({ "message": failure.to_string() })),
    }
}

/// An operation bound to the lifecycle orchestrator
///
/// # Example
///
/// ```rust,ignore
/// let handler = ApiHandler::new(
///     GetOne::new().with_connector(UserStore::new(pool)),
/// );
/// let response = handler.handle(event).await?;
/// ```
pub struct ApiHandler<O> {
    operation: O,
}

impl<O: Operation> ApiHandler<O> {
    /// Bind a configured operation
    #[must_use]
    pub fn new(operation: O) -> Self {
        Self { operation }
    }

    /// Run one gateway event through the operation's lifecycle
    ///
    /// # Errors
    ///
    /// Propagates server-side failures, as [`handle`] does.
    pub async fn handle(&self, event: GatewayEvent) -> HandlerResult<GatewayResponse> {
        handle(&self.operation, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::DataConnector;
    use crate::ops::{CreateOne, GetMany, GetOne};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;

    struct FixedBody(Value);

    #[async_trait]
    impl Operation for FixedBody {
        async fn process(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
            ctx.set_body(self.0.clone());
            Ok(())
        }
    }

    struct FailingValidator {
        status: Option<StatusCode>,
    }

    #[async_trait]
    impl Operation for FailingValidator {
        async fn validate_data(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
            if let Some(status) = self.status {
                ctx.set_status_code(status);
            }
            Err(HandlerError::validation("rejected"))
        }

        async fn process(&self, _ctx: &mut ApiContext) -> HandlerResult<()> {
            panic!("process must not run after a validator failure");
        }
    }

    struct FailingProcess {
        status: Option<StatusCode>,
    }

    #[async_trait]
    impl Operation for FailingProcess {
        async fn process(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
            if let Some(status) = self.status {
                ctx.set_status_code(status);
            }
            Err(HandlerError::process("broken"))
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl DataConnector for EmptyStore {
        async fn get_one(&self, _id: &str) -> HandlerResult<Option<Value>> {
            Ok(None)
        }
    }

    struct TenStore;

    #[async_trait]
    impl DataConnector for TenStore {
        async fn insert_one(&self, _data: Value) -> HandlerResult<Option<Value>> {
            Ok(Some(json!(10)))
        }

        async fn get(
            &self,
            _params: crate::connector::FetchParams,
        ) -> HandlerResult<Vec<Value>> {
            Ok(vec![json!({"id": 10})])
        }
    }

    #[tokio::test]
    async fn test_success_returns_the_finalized_response() {
        let response = handle(&FixedBody(json!({"ok": true})), GatewayEvent::default())
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["content-type"], "application/json");
        assert_eq!(response.body, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_repeated_invocations_are_byte_identical() {
        let operation = FixedBody(json!({"items": [1, 2, 3]}));
        let first = handle(&operation, GatewayEvent::default()).await.unwrap();
        let second = handle(&operation, GatewayEvent::default()).await.unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_response_headers_serialize_in_a_stable_order() {
        struct ManyHeaders;

        #[async_trait]
        impl Operation for ManyHeaders {
            async fn process(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
                ctx.set_headers(
                    (0..16)
                        .map(|n| (format!("x-header-{n}"), n.to_string()))
                        .collect(),
                );
                ctx.set_body(json!({"ok": true}));
                Ok(())
            }
        }

        let reference = serde_json::to_vec(
            &handle(&ManyHeaders, GatewayEvent::default()).await.unwrap(),
        )
        .unwrap();
        for _ in 0..200 {
            let response = handle(&ManyHeaders, GatewayEvent::default()).await.unwrap();
            assert_eq!(serde_json::to_vec(&response).unwrap(), reference);
        }
    }

    #[tokio::test]
    async fn test_validator_failure_maps_to_400() {
        let response = handle(&FailingValidator { status: None }, GatewayEvent::default())
            .await
            .unwrap();
        assert_eq!(response.status_code, 400);
        assert!(response.headers.is_empty());
        assert_eq!(response.body, Some(json!({"message": "rejected"})));
    }

    #[tokio::test]
    async fn test_validator_failure_keeps_an_explicit_status() {
        let operation = FailingValidator {
            status: Some(StatusCode::UNPROCESSABLE_ENTITY),
        };
        let response = handle(&operation, GatewayEvent::default()).await.unwrap();
        assert_eq!(response.status_code, 422);
    }

    #[tokio::test]
    async fn test_process_failure_below_500_maps_to_a_client_response() {
        let operation = FailingProcess {
            status: Some(StatusCode::CONFLICT),
        };
        let response = handle(&operation, GatewayEvent::default()).await.unwrap();
        assert_eq!(response.status_code, 409);
        assert_eq!(response.body, Some(json!({"message": "broken"})));
    }

    #[tokio::test]
    async fn test_process_failure_without_a_status_propagates() {
        let result = handle(&FailingProcess { status: None }, GatewayEvent::default()).await;
        assert_eq!(result.unwrap_err().to_string(), "broken");
    }

    #[tokio::test]
    async fn test_process_failure_at_500_or_above_propagates() {
        let operation = FailingProcess {
            status: Some(StatusCode::BAD_GATEWAY),
        };
        assert!(handle(&operation, GatewayEvent::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_one_miss_yields_404() {
        let handler = ApiHandler::new(GetOne::new().with_connector(EmptyStore));
        let event = GatewayEvent {
            path_parameters: Some(HashMap::from([("id".to_string(), "7".to_string())])),
            ..GatewayEvent::default()
        };

        let response = handler.handle(event).await.unwrap();
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, Some(json!({"message": "Not found"})));
    }

    #[tokio::test]
    async fn test_create_one_end_to_end() {
        let handler = ApiHandler::new(CreateOne::new().with_connector(TenStore));
        let event = GatewayEvent {
            body: Some(r#"{"name":"alice"}"#.to_string()),
            ..GatewayEvent::default()
        };

        let response = handler.handle(event).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, Some(json!({"id": 10})));
    }

    #[tokio::test]
    async fn test_fetch_many_query_failure_maps_to_400() {
        let handler = ApiHandler::new(
            GetMany::new()
                .with_connector(TenStore)
                .with_sortable_fields(["name"]),
        );
        let event = GatewayEvent {
            query_string_parameters: Some(HashMap::from([(
                "sortBy".to_string(),
                "password".to_string(),
            )])),
            ..GatewayEvent::default()
        };

        let response = handler.handle(event).await.unwrap();
        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body,
            Some(json!({"message": "Invalid sort field password"}))
        );
    }

    #[tokio::test]
    async fn test_fetch_many_end_to_end() {
        let handler = ApiHandler::new(GetMany::new().with_connector(TenStore));
        let response = handler.handle(GatewayEvent::default()).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, Some(json!([{"id": 10}])));
    }

    #[tokio::test]
    async fn test_missing_connector_propagates_as_a_server_failure() {
        let handler = ApiHandler::new(CreateOne::new());
        let result = handler.handle(GatewayEvent::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            HandlerError::Configuration(_)
        ));
    }
}

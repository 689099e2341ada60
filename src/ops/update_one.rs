//! Update-one operation variant

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use http::StatusCode;
use serde_json::{json, Value};

use crate::api::ApiContext;
use crate::connector::DataConnector;
use crate::error::{ConfigurationError, HandlerError, HandlerResult};

use super::{BodyValidator, Operation, RecordHook, UpdatedHook};

/// Update the record addressed by the `id` path parameter
///
/// Validation requires the path id and runs the optional body validator.
/// `process` optionally reshapes the body before saving, hands `(id, data)`
/// to the connector, maps a zero affected count to a 404 failure, runs the
/// post-save hook with `(id, data)`, and responds with `{"id": ...}` unless a
/// response transform is configured.
///
/// # Example
///
/// ```rust,ignore
/// let operation = UpdateOne::new()
///     .with_connector(UserStore::new(pool))
///     .with_post_save(|id, data| async move { invalidate_cache(&id, &data).await });
/// ```
#[derive(Default)]
pub struct UpdateOne {
    connector: Option<Arc<dyn DataConnector>>,
    body_validator: Option<BodyValidator>,
    format_record: Option<RecordHook>,
    post_save: Option<UpdatedHook>,
    format_response: Option<RecordHook>,
}

impl UpdateOne {
    /// Create an unconfigured variant
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the data connector (must support `update_one`)
    #[must_use]
    pub fn with_connector(mut self, connector: impl DataConnector + 'static) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Validate the parsed request body during the validation phase
    #[must_use]
    pub fn with_body_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> HandlerResult<()> + Send + Sync + 'static,
    {
        self.body_validator = Some(Box::new(validator));
        self
    }

    /// Transform the body before it is handed to the connector
    #[must_use]
    pub fn with_format_record<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        self.format_record = Some(Box::new(move |record| hook(record).boxed()));
        self
    }

    /// Run after a successful update with the path id and the saved data
    #[must_use]
    pub fn with_post_save<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(String, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<()>> + Send + 'static,
    {
        self.post_save = Some(Box::new(move |id, data| hook(id, data).boxed()));
        self
    }

    /// Reshape the default `{"id": ...}` response body
    #[must_use]
    pub fn with_format_response<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        self.format_response = Some(Box::new(move |response| hook(response).boxed()));
        self
    }
}

#[async_trait]
impl Operation for UpdateOne {
    async fn validate_data(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        if ctx.path_param("id").is_none() {
            return Err(HandlerError::validation("Missing ID in request path"));
        }

        if let Some(body_validator) = &self.body_validator {
            let body = ctx.body()?.cloned().unwrap_or(Value::Null);
            body_validator(&body)?;
        }

        Ok(())
    }

    async fn process(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        let connector = self
            .connector
            .as_ref()
            .ok_or_else(ConfigurationError::missing_connector)?;

        let id = ctx
            .path_param("id")
            .map(str::to_owned)
            .ok_or_else(|| HandlerError::validation("Missing ID in request path"))?;

        let mut data = ctx.body()?.cloned().unwrap_or(Value::Null);
        if let Some(format_record) = &self.format_record {
            data = format_record(data).await?;
        }

        let updated_count = connector.update_one(&id, data.clone()).await?;

        if updated_count == 0 {
            ctx.set_status_code(StatusCode::NOT_FOUND);
            return Err(HandlerError::process("Not found"));
        }

        if let Some(post_save) = &self.post_save {
            post_save(id.clone(), data).await?;
        }

        let mut response = json!({ "id": id });
        if let Some(format_response) = &self.format_response {
            response = format_response(response).await?;
        }

        ctx.set_body(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::GatewayEvent;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct UpdateConnector {
        updated_count: u64,
        received: Mutex<Option<(String, Value)>>,
    }

    impl UpdateConnector {
        fn new(updated_count: u64) -> Self {
            Self {
                updated_count,
                received: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl DataConnector for Arc<UpdateConnector> {
        async fn update_one(&self, id: &str, data: Value) -> HandlerResult<u64> {
            *self.received.lock().unwrap() = Some((id.to_string(), data));
            Ok(self.updated_count)
        }
    }

    fn event(id: Option<&str>, body: Option<&str>) -> GatewayEvent {
        GatewayEvent {
            path_parameters: id
                .map(|id| HashMap::from([("id".to_string(), id.to_string())])),
            body: body.map(str::to_string),
            ..GatewayEvent::default()
        }
    }

    #[tokio::test]
    async fn test_missing_path_id_fails_validation() {
        let operation = UpdateOne::new();
        let mut ctx = ApiContext::new(event(None, None));
        let error = operation.validate_data(&mut ctx).await.unwrap_err();
        assert_eq!(error.to_string(), "Missing ID in request path");
    }

    #[tokio::test]
    async fn test_update_responds_with_path_id() {
        let connector = Arc::new(UpdateConnector::new(1));
        let operation = UpdateOne::new().with_connector(Arc::clone(&connector));

        let mut ctx = ApiContext::new(event(Some("42"), Some(r#"{"name":"bob"}"#)));
        operation.validate_data(&mut ctx).await.unwrap();
        operation.process(&mut ctx).await.unwrap();

        let response = ctx.into_response();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, Some(json!({"id": "42"})));

        let (id, data) = connector.received.lock().unwrap().clone().unwrap();
        assert_eq!(id, "42");
        assert_eq!(data, json!({"name": "bob"}));
    }

    #[tokio::test]
    async fn test_zero_affected_rows_sets_404_and_fails() {
        let connector = Arc::new(UpdateConnector::new(0));
        let operation = UpdateOne::new().with_connector(Arc::clone(&connector));

        let mut ctx = ApiContext::new(event(Some("42"), Some("{}")));
        let error = operation.process(&mut ctx).await.unwrap_err();
        assert_eq!(error.to_string(), "Not found");
        assert_eq!(ctx.status_code(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_body_validator_runs_after_id_check() {
        let connector = Arc::new(UpdateConnector::new(1));
        let operation = UpdateOne::new()
            .with_connector(Arc::clone(&connector))
            .with_body_validator(|body| {
                if body.get("name").is_some() {
                    Ok(())
                } else {
                    Err(HandlerError::validation("name is required"))
                }
            });

        // Missing id wins over the body validator.
        let mut ctx = ApiContext::new(event(None, Some("{}")));
        let error = operation.validate_data(&mut ctx).await.unwrap_err();
        assert_eq!(error.to_string(), "Missing ID in request path");

        let mut ctx = ApiContext::new(event(Some("42"), Some("{}")));
        let error = operation.validate_data(&mut ctx).await.unwrap_err();
        assert_eq!(error.to_string(), "name is required");
    }

    #[tokio::test]
    async fn test_format_record_runs_before_update() {
        let connector = Arc::new(UpdateConnector::new(1));
        let operation = UpdateOne::new()
            .with_connector(Arc::clone(&connector))
            .with_format_record(|mut record| async move {
                if let Some(fields) = record.as_object_mut() {
                    fields.insert("updatedBy".to_string(), json!("system"));
                }
                Ok(record)
            });

        let mut ctx = ApiContext::new(event(Some("42"), Some(r#"{"name":"bob"}"#)));
        operation.process(&mut ctx).await.unwrap();

        let (_, data) = connector.received.lock().unwrap().clone().unwrap();
        assert_eq!(data, json!({"name": "bob", "updatedBy": "system"}));
    }

    #[tokio::test]
    async fn test_post_save_receives_id_and_data() {
        let seen = Arc::new(Mutex::new(None));
        let seen_by_hook = Arc::clone(&seen);

        let connector = Arc::new(UpdateConnector::new(1));
        let operation = UpdateOne::new()
            .with_connector(Arc::clone(&connector))
            .with_post_save(move |id, data| {
                let seen = Arc::clone(&seen_by_hook);
                async move {
                    *seen.lock().unwrap() = Some((id, data));
                    Ok(())
                }
            });

        let mut ctx = ApiContext::new(event(Some("42"), Some(r#"{"name":"bob"}"#)));
        operation.process(&mut ctx).await.unwrap();

        let (id, data) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(id, "42");
        assert_eq!(data, json!({"name": "bob"}));
    }

    #[tokio::test]
    async fn test_format_response_reshapes_default_body() {
        let connector = Arc::new(UpdateConnector::new(1));
        let operation = UpdateOne::new()
            .with_connector(Arc::clone(&connector))
            .with_format_response(|response| async move {
                Ok(json!({"updated": response["id"]}))
            });

        let mut ctx = ApiContext::new(event(Some("42"), Some("{}")));
        operation.process(&mut ctx).await.unwrap();
        assert_eq!(ctx.into_response().body, Some(json!({"updated": "42"})));
    }

    #[tokio::test]
    async fn test_missing_connector_is_a_configuration_error() {
        let operation = UpdateOne::new();
        let mut ctx = ApiContext::new(event(Some("42"), Some("{}")));
        let error = operation.process(&mut ctx).await.unwrap_err();
        assert!(matches!(error, HandlerError::Configuration(_)));
    }
}

//! Create-one operation variant

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{json, Value};

use crate::api::ApiContext;
use crate::connector::DataConnector;
use crate::error::{ConfigurationError, HandlerError, HandlerResult};

use super::{BodyValidator, InsertedHook, Operation, RecordHook};

/// Insert a record built from the request body
///
/// The optional body validator runs during the validation phase (an absent
/// body validates as JSON null). `process` optionally reshapes the body
/// before saving, inserts it, runs the post-save hook with the generated id,
/// and responds with `{"id": ...}` unless a response transform is configured.
/// A connector returning no id (or JSON null) is treated as an insert
/// failure and propagates as a server error.
///
/// # Example
///
/// ```rust,ignore
/// let operation = CreateOne::new()
///     .with_connector(UserStore::new(pool))
///     .with_body_validator(|body| {
///         body.get("email")
///             .and_then(Value::as_str)
///             .map(drop)
///             .ok_or_else(|| HandlerError::validation("email is required"))
///     })
///     .with_post_save(|id| async move { notify_created(id).await });
/// ```
#[derive(Default)]
pub struct CreateOne {
    connector: Option<Arc<dyn DataConnector>>,
    body_validator: Option<BodyValidator>,
    format_record: Option<RecordHook>,
    post_save: Option<InsertedHook>,
    format_response: Option<RecordHook>,
}

impl CreateOne {
    /// Create an unconfigured variant
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the data connector (must support `insert_one`)
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

    /// Run after a successful insert with the generated id
    #[must_use]
    pub fn with_post_save<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<()>> + Send + 'static,
    {
        self.post_save = Some(Box::new(move |id| hook(id).boxed()));
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
impl Operation for CreateOne {
    async fn validate_data(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
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

        let mut data = ctx.body()?.cloned().unwrap_or(Value::Null);
        if let Some(format_record) = &self.format_record {
            data = format_record(data).await?;
        }

        let inserted_id = connector
            .insert_one(data)
            .await?
            .filter(|id| !id.is_null());

        let Some(id) = inserted_id else {
            return Err(HandlerError::process("Failed to insert"));
        };

        if let Some(post_save) = &self.post_save {
            post_save(id.clone()).await?;
        }

        let mut response = json!({ "id": id });
        if let Some(format_response) = &self.format_response {
            response = format_response(response).await?;
        }

        ctx.set_body(response);
        Ok(())
    }
}

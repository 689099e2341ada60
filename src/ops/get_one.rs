//! Fetch-one operation variant

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use http::StatusCode;
use serde_json::Value;

use crate::api::ApiContext;
use crate::connector::DataConnector;
use crate::error::{ConfigurationError, HandlerError, HandlerResult};

use super::{Operation, RecordHook};

/// Fetch a single record addressed by the `id` path parameter
///
/// A missing path id fails validation; a connector returning no record (or an
/// explicit JSON null) sets status 404 and fails processing.
///
/// # Example
///
/// ```rust,ignore
/// let operation = GetOne::new()
///     .with_connector(UserStore::new(pool))
///     .with_format_record(|record| async move { Ok(redact_email(record)) });
/// ```
#[derive(Default)]
pub struct GetOne {
    connector: Option<Arc<dyn DataConnector>>,
    format_record: Option<RecordHook>,
}

impl GetOne {
    /// Create an unconfigured variant
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the data connector (must support `get_one`)
    #[must_use]
    pub fn with_connector(mut self, connector: impl DataConnector + 'static) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Transform the fetched record before it becomes the body
    #[must_use]
    pub fn with_format_record<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        self.format_record = Some(Box::new(move |record| hook(record).boxed()));
        self
    }
}

#[async_trait]
impl Operation for GetOne {
    async fn validate_data(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        if ctx.path_param("id").is_none() {
            return Err(HandlerError::validation("Missing ID in request path"));
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

        let record = connector
            .get_one(&id)
            .await?
            .filter(|record| !record.is_null());

        let Some(mut record) = record else {
            ctx.set_status_code(StatusCode::NOT_FOUND);
            return Err(HandlerError::process("Not found"));
        };

        if let Some(format_record) = &self.format_record {
            record = format_record(record).await?;
        }

        ctx.set_body(record);
        Ok(())
    }
}

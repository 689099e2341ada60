//! Fetch-many operation variant

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;

use crate::api::ApiContext;
use crate::connector::{DataConnector, FetchParams};
use crate::error::{ConfigurationError, HandlerResult};
use crate::query::{Filter, FilterDefinition, Paging, Sort};

use super::{Operation, RecordHook, RecordsHook};

/// Fetch a filtered, sorted, paged list of records
///
/// `validate_data` parses the structured query string with the filter, sort,
/// and paging parsers and stores the resulting [`FetchParams`] on the context;
/// `process` hands them to the connector's `get`, optionally reshapes the
/// result (whole-list transform first, then per-record), and sets the array
/// body.
///
/// # Example
///
/// ```rust,ignore
/// let operation = GetMany::new()
///     .with_connector(ProductStore::new(pool))
///     .with_filters_definition(vec![
///         "status".into(),
///         FilterDefinition::new("minPrice")
///             .with_internal_name("price")
///             .with_operator(FilterOperator::GreaterOrEqual),
///     ])
///     .with_sortable_fields(["name", "price"]);
/// ```
#[derive(Default)]
pub struct GetMany {
    connector: Option<Arc<dyn DataConnector>>,
    filters_definition: Option<Vec<FilterDefinition>>,
    sortable_fields: Vec<String>,
    paging: Paging,
    format_records: Option<RecordsHook>,
    format_record: Option<RecordHook>,
}

impl GetMany {
    /// Create an unconfigured variant
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            filters_definition: None,
            sortable_fields: Vec::new(),
            paging: Paging::default(),
            format_records: None,
            format_record: None,
        }
    }

    /// Supply the data connector (must support `get`)
    #[must_use]
    pub fn with_connector(mut self, connector: impl DataConnector + 'static) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Enable filter parsing with the given definitions
    ///
    /// Without a definition, requested filters are ignored entirely.
    #[must_use]
    pub fn with_filters_definition(mut self, definitions: Vec<FilterDefinition>) -> Self {
        self.filters_definition = Some(definitions);
        self
    }

    /// Allow sorting by the given fields
    #[must_use]
    pub fn with_sortable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Override the default paging bounds
    #[must_use]
    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    /// Transform the whole result list before it becomes the body
    #[must_use]
    pub fn with_format_records<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Vec<Value>>> + Send + 'static,
    {
        self.format_records = Some(Box::new(move |records| hook(records).boxed()));
        self
    }

    /// Transform each record before it becomes part of the body
    ///
    /// Runs after [`with_format_records`](GetMany::with_format_records).
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
impl Operation for GetMany {
    async fn validate_data(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        let query = ctx.query().clone();
        let mut params = FetchParams::default();

        if let Some(definitions) = &self.filters_definition {
            let filter = Filter::new(definitions.clone())?;
            params.filters = filter.parse(query.get("filters").and_then(Value::as_object));
        }

        if let Some(sort_by) = query.get("sortBy").and_then(Value::as_str) {
            let sort = Sort::new(self.sortable_fields.iter().map(String::as_str));
            let criteria = query.get("sortCriteria").and_then(Value::as_str);
            if let Some(sort_params) = sort.parse(Some(sort_by), criteria)? {
                params.sort_by = Some(sort_params.sort_by);
                params.sort_criteria = Some(sort_params.sort_criteria);
            }
        }

        let paging = self
            .paging
            .parse(query.get("page"), query.get("pageSize"))?;
        params.page_number = paging.page_number;
        params.page_size = paging.page_size;

        ctx.extensions_mut().insert(params);
        Ok(())
    }

    async fn process(&self, ctx: &mut ApiContext) -> HandlerResult<()> {
        let connector = self
            .connector
            .as_ref()
            .ok_or_else(ConfigurationError::missing_connector)?;

        let params = ctx
            .extensions_mut()
            .remove::<FetchParams>()
            .unwrap_or_default();

        let mut records = connector.get(params).await?;

        if let Some(format_records) = &self.format_records {
            records = format_records(records).await?;
        }

        if let Some(format_record) = &self.format_record {
            let mut formatted = Vec::with_capacity(records.len());
            for record in records {
                formatted.push(format_record(record).await?);
            }
            records = formatted;
        }

        ctx.set_body(Value::Array(records));
        Ok(())
    }
}

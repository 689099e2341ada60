//! Request filter parsing
//!
//! Converts a flat mapping of requested filter names to raw values into a
//! structured filter mapping, driven by per-field [`FilterDefinition`]s. A
//! definition names the request-facing field, and optionally renames it,
//! transforms its value, and selects a comparison operator. Several
//! definitions may share a request-facing name; each contributes one
//! `{operator: value}` clause to that field's output.
//!
//! # Example
//!
//! ```rust
//! use portico_service::query::{Filter, FilterDefinition, FilterOperator};
//! use serde_json::{json, Map};
//!
//! // A "between"-style range expressed as two clauses on the same field.
//! let filter = Filter::new(vec![
//!     FilterDefinition::new("quantity")
//!         .with_operator(FilterOperator::Greater)
//!         .with_value_mapper(|v| json!(v.as_i64().unwrap_or(0) - 1)),
//!     FilterDefinition::new("quantity")
//!         .with_operator(FilterOperator::Lesser)
//!         .with_value_mapper(|v| json!(v.as_i64().unwrap_or(0) + 1)),
//! ])
//! .unwrap();
//!
//! let mut request = Map::new();
//! request.insert("quantity".into(), json!(10));
//!
//! let parsed = filter.parse(Some(&request));
//! assert_eq!(parsed["quantity"][&FilterOperator::Greater], json!(9));
//! assert_eq!(parsed["quantity"][&FilterOperator::Lesser], json!(11));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FilterError;

/// Comparison operator attached to a filter clause
///
/// # Example
///
/// ```rust
/// use portico_service::query::FilterOperator;
///
/// assert_eq!(FilterOperator::default(), FilterOperator::Equal);
/// assert_eq!(format!("{}", FilterOperator::GreaterOrEqual), "greaterOrEqual");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Equal to
    #[default]
    Equal,
    /// Not equal to
    NotEqual,
    /// Less than
    Lesser,
    /// Less than or equal to
    LesserOrEqual,
    /// Greater than or equal to
    GreaterOrEqual,
    /// Greater than
    Greater,
    /// Within an inclusive range
    Between,
}

impl FilterOperator {
    /// The wire name of this operator
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::Lesser => "lesser",
            Self::LesserOrEqual => "lesserOrEqual",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::Greater => "greater",
            Self::Between => "between",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved output name for a filter clause
///
/// Either a static internal name, or a function deriving the name from the
/// request-facing name, the raw value, and the mapped value.
#[derive(Clone)]
pub enum InternalName {
    /// Use this name verbatim
    Static(String),
    /// Derive the name from `(name, raw_value, mapped_value)`
    Derived(Arc<dyn Fn(&str, &Value, &Value) -> String + Send + Sync>),
}

impl fmt::Debug for InternalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(name) => f.debug_tuple("Static").field(name).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Clauses produced for one output field, keyed by operator
pub type FilterClauses = BTreeMap<FilterOperator, Value>;

/// Parsed filter mapping: resolved field name → operator → final value
pub type ParsedFilters = BTreeMap<String, FilterClauses>;

type ValueMapper = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Definition of a single filter clause
///
/// Built with a fluent API. A bare field name is the common case, so `&str`
/// and `String` convert directly into a definition.
///
/// # Example
///
/// ```rust
/// use portico_service::query::{FilterDefinition, FilterOperator};
///
/// let definition = FilterDefinition::new("status")
///     .with_internal_name("state")
///     .with_operator(FilterOperator::NotEqual);
/// assert_eq!(definition.name(), "status");
/// ```
#[derive(Clone)]
pub struct FilterDefinition {
    name: String,
    internal_name: Option<InternalName>,
    value_mapper: Option<ValueMapper>,
    operator: FilterOperator,
}

impl FilterDefinition {
    /// Create a definition for the given request-facing field name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            internal_name: None,
            value_mapper: None,
            operator: FilterOperator::Equal,
        }
    }

    /// Rename the output field to a static internal name
    #[must_use]
    pub fn with_internal_name(mut self, internal_name: impl Into<String>) -> Self {
        self.internal_name = Some(InternalName::Static(internal_name.into()));
        self
    }

    /// Derive the output field name from `(name, raw_value, mapped_value)`
    #[must_use]
    pub fn with_derived_name<F>(mut self, derive: F) -> Self
    where
        F: Fn(&str, &Value, &Value) -> String + Send + Sync + 'static,
    {
        self.internal_name = Some(InternalName::Derived(Arc::new(derive)));
        self
    }

    /// Transform the raw request value before it lands in the output clause
    #[must_use]
    pub fn with_value_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.value_mapper = Some(Arc::new(mapper));
        self
    }

    /// Set the comparison operator (default [`FilterOperator::Equal`])
    #[must_use]
    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = operator;
        self
    }

    /// The request-facing field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, parsed: &mut ParsedFilters, raw_value: &Value) {
        let final_value = match &self.value_mapper {
            Some(mapper) => mapper(raw_value),
            None => raw_value.clone(),
        };

        let final_name = match &self.internal_name {
            Some(InternalName::Static(name)) => name.clone(),
            Some(InternalName::Derived(derive)) => derive(&self.name, raw_value, &final_value),
            None => self.name.clone(),
        };

        parsed
            .entry(final_name)
            .or_default()
            .insert(self.operator, final_value);
    }
}

impl fmt::Debug for FilterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDefinition")
            .field("name", &self.name)
            .field("operator", &self.operator)
            .finish_non_exhaustive()
    }
}

impl From<&str> for FilterDefinition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FilterDefinition {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Request filter parser
///
/// Groups definitions by request-facing name at construction and applies the
/// matching group to each incoming filter. Unknown filter names are silently
/// dropped from the output; they are never an error.
///
/// # Example
///
/// ```rust
/// use portico_service::query::{Filter, FilterOperator};
/// use serde_json::{json, Map};
///
/// let filter = Filter::new(vec!["foo".into()]).unwrap();
///
/// let mut request = Map::new();
/// request.insert("foo".into(), json!("bar"));
/// request.insert("unknown".into(), json!("ignored"));
///
/// let parsed = filter.parse(Some(&request));
/// assert_eq!(parsed["foo"][&FilterOperator::Equal], json!("bar"));
/// assert!(!parsed.contains_key("unknown"));
/// ```
#[derive(Debug)]
pub struct Filter {
    definitions: HashMap<String, Vec<FilterDefinition>>,
}

impl Filter {
    /// Build a parser from a list of definitions
    ///
    /// Definitions sharing a name are kept in definition order and each
    /// contributes one clause when that filter arrives.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if any definition has an empty name. This is a
    /// configuration problem caught at definition-parse time, before any
    /// request filter is inspected.
    pub fn new(definitions: Vec<FilterDefinition>) -> Result<Self, FilterError> {
        let mut grouped: HashMap<String, Vec<FilterDefinition>> = HashMap::new();

        for definition in definitions {
            if definition.name.is_empty() {
                return Err(FilterError::new("Filter definition requires a name"));
            }
            grouped
                .entry(definition.name.clone())
                .or_default()
                .push(definition);
        }

        Ok(Self {
            definitions: grouped,
        })
    }

    /// Parse the requested filters into a structured mapping
    ///
    /// A missing request filter mapping yields an empty result, never an
    /// error.
    #[must_use]
    pub fn parse(&self, request_filters: Option<&Map<String, Value>>) -> ParsedFilters {
        let mut parsed = ParsedFilters::new();

        let Some(request_filters) = request_filters else {
            return parsed;
        };

        for (filter_name, raw_value) in request_filters {
            let Some(group) = self.definitions.get(filter_name) else {
                continue;
            };
            for definition in group {
                definition.apply(&mut parsed, raw_value);
            }
        }

        parsed
    }
}

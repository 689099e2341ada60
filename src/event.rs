//! Gateway event and response wire shapes
//!
//! These types mirror the JSON payloads exchanged with a cloud API gateway:
//! an inbound [`GatewayEvent`] carrying headers, query string parameters, path
//! parameters, a raw body string, and authorizer claims; and an outbound
//! [`GatewayResponse`] carrying a status code, headers, and a JSON body.
//!
//! The response body is emitted as a [`serde_json::Value`], not a
//! pre-serialized string: encoding the final payload is left to the boundary
//! layer that owns the transport.
//!
//! # Example
//!
//! ```rust
//! use portico_service::event::GatewayEvent;
//!
//! let event: GatewayEvent = serde_json::from_str(
//!     r#"{"queryStringParameters": {"page": "2"}, "pathParameters": {"id": "42"}}"#,
//! ).unwrap();
//! assert_eq!(event.path_parameters.unwrap()["id"], "42");
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound request event as delivered by the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayEvent {
    /// Raw request headers, in whatever casing the client sent
    pub headers: HashMap<String, String>,
    /// Flat query string parameters (values are percent-decoded by the gateway)
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Path parameters extracted by the gateway route
    pub path_parameters: Option<HashMap<String, String>>,
    /// Raw request body, if any
    pub body: Option<String>,
    /// Authorizer output attached by the gateway
    pub authorizer: Option<RequestAuthorizer>,
}

/// Authorizer context attached to the event by the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestAuthorizer {
    /// Token claims forwarded by the authorizer
    pub claims: Map<String, Value>,
}

/// Outbound wire response
///
/// # Example
///
/// ```rust
/// use portico_service::event::GatewayResponse;
/// use serde_json::json;
///
/// let response = GatewayResponse {
///     status_code: 200,
///     headers: Default::default(),
///     body: Some(json!({"id": 10})),
/// };
/// assert!(serde_json::to_string(&response).unwrap().contains("\"statusCode\":200"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response headers, ordered so identical responses serialize identically
    pub headers: BTreeMap<String, String>,
    /// JSON response body, encoded by the boundary layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Structure flat query string parameters into nested JSON values.
///
/// Bracketed key segments describe nesting: `filters[foo]=bar` becomes
/// `{"filters": {"foo": "bar"}}` and all-digit segments are array indices, so
/// `id[0]=100&id[1]=200` becomes `{"id": ["100", "200"]}`. Keys with
/// unbalanced brackets are kept as literal keys. Leaf values stay strings.
pub(crate) fn structure_query(params: &HashMap<String, String>) -> Map<String, Value> {
    let mut structured = Map::new();

    for (key, value) in params {
        match split_key(key) {
            Some((root, segments)) if !segments.is_empty() => {
                let slot = structured.entry(root).or_insert(Value::Null);
                insert_at_path(slot, &segments, value);
            }
            _ => {
                structured.insert(key.clone(), Value::String(value.clone()));
            }
        }
    }

    structured
}

/// Split `a[b][0]` into `("a", ["b", "0"])`. Returns `None` for unbalanced
/// brackets so the caller falls back to a literal key.
fn split_key(key: &str) -> Option<(String, Vec<String>)> {
    let Some(open) = key.find('[') else {
        return Some((key.to_string(), Vec::new()));
    };

    let root = &key[..open];
    if root.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return None;
        }
        let close = rest.find(']')?;
        segments.push(rest[1..close].to_string());
        rest = &rest[close + 1..];
    }

    Some((root.to_string(), segments))
}

fn insert_at_path(slot: &mut Value, segments: &[String], value: &str) {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = Value::String(value.to_string());
        return;
    };

    if let Ok(index) = segment.parse::<usize>() {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            while items.len() <= index {
                items.push(Value::Null);
            }
            insert_at_path(&mut items[index], rest, value);
        }
    } else {
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(entries) = slot {
            let child = entries.entry(segment.clone()).or_insert(Value::Null);
            insert_at_path(child, rest, value);
        }
    }
}

//! Raw input extraction.
//!
//! Both extractors are total: a missing or malformed payload becomes
//! `Value::Null`, leaving it to the action's input schema to reject it.

use bytes::Bytes;
use http::Uri;
use serde_json::Value;

/// Query key carrying the serialized input of GET actions.
pub const INPUT_QUERY_KEY: &str = "input";

/// Parses a request body as JSON.
///
/// ```
/// use bytes::Bytes;
/// use praxis_server::read_body_input;
/// use serde_json::{json, Value};
///
/// assert_eq!(read_body_input(&Bytes::from_static(br#"{"id":1}"#)), json!({ "id": 1 }));
/// assert_eq!(read_body_input(&Bytes::from_static(b"not json")), Value::Null);
/// ```
pub fn read_body_input(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding unparsable request body");
            Value::Null
        }
    }
}

/// Parses the `input` query parameter as JSON.
pub fn read_query_input(uri: &Uri) -> Value {
    let Some(query) = uri.query() else {
        return Value::Null;
    };

    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed query string");
            return Value::Null;
        }
    };

    pairs
        .into_iter()
        .find(|(key, _)| key == INPUT_QUERY_KEY)
        .and_then(|(_, raw)| serde_json::from_str(&raw).ok())
        .unwrap_or(Value::Null)
}

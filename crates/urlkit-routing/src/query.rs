//! Query string serialization.
//!
//! [`build_query`] flattens a JSON object into form-encoded `key=value`
//! pairs and [`append_query`] attaches the result to a URL with the right
//! separator.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Serializes `args` into a query string, pairs joined by `separator`.
///
/// Nested objects and arrays flatten into bracketed keys (`filter[color]`,
/// `ids[0]`). Booleans serialize as `1`/`0` and `null` entries are skipped.
/// Keys and values are form-url-encoded, so spaces become `+` and brackets
/// are percent-encoded. Keys come out in the map's iteration order, which
/// for `serde_json::Map` is sorted.
///
/// # Examples
///
/// ```
/// use urlkit_routing::query::build_query;
///
/// let args = serde_json::json!({"page": 2, "q": "red shoes"});
/// assert_eq!(build_query(args.as_object().unwrap(), "&"), "page=2&q=red+shoes");
/// ```
pub fn build_query(args: &Map<String, Value>, separator: &str) -> String {
    let mut pairs = Vec::new();
    for (key, value) in args {
        flatten(key.clone(), value, &mut pairs);
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Appends `query` to `url` after `?`, or after `&` if `url` already has a query.
///
/// An empty `query` leaves `url` untouched.
pub fn append_query(url: &mut String, query: &str) {
    if query.is_empty() {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(query);
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub_key, item) in map {
                flatten(format!("{key}[{sub_key}]"), item, pairs);
            }
        }
    }
}

fn encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

//! Forgiving accessors over untyped dashboard JSON.
//!
//! Dashboard documents drift between server versions, so every lookup here
//! answers with a default instead of failing: a missing key, a `null`, or a
//! value of the wrong type all read as the empty string, empty slice or
//! empty object. Callers never branch on "was it there".

use serde_json::{Map, Value};

static EMPTY_MAP: once_cell::sync::Lazy<Map<String, Value>> = once_cell::sync::Lazy::new(Map::new);

/// Follow `keys` through nested objects. `None` if any step is missing or not an object.
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// String at `keys`, or `""` when absent or not a string.
pub fn str_at<'a>(value: &'a Value, keys: &[&str]) -> &'a str {
    lookup(value, keys).and_then(Value::as_str).unwrap_or("")
}

/// String at `keys` if it is present and a string.
pub fn opt_str_at<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    lookup(value, keys).and_then(Value::as_str)
}

/// Array at `keys`, or an empty slice.
pub fn array_at<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    lookup(value, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Object at `keys`, or an empty map. Key order follows the source document.
pub fn object_at<'a>(value: &'a Value, keys: &[&str]) -> &'a Map<String, Value> {
    lookup(value, keys)
        .and_then(Value::as_object)
        .unwrap_or(&EMPTY_MAP)
}

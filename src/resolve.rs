//! Optional chaining over nested fields.

use serde::Serialize;
use serde_json::Value;

/// Resolves a dotted attribute path such as `"ticket.weblink"` on any
/// serializable value.
///
/// Returns `None` when any segment is missing or null, or when the value
/// cannot be serialized. Numeric segments index into arrays.
pub fn resolve_attr<T: Serialize + ?Sized>(object: &T, path: &str) -> Option<Value> {
    let root = serde_json::to_value(object).ok()?;
    let mut current = &root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        value => Some(value.clone()),
    }
}

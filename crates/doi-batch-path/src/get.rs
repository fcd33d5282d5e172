use serde_json::Value;

use crate::types::Segment;

/// Look up one child of a container by key.
///
/// Objects are indexed by key; lists accept a decimal element index.
/// Scalars and `null` have no children.
pub fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => items.get(key.parse::<usize>().ok()?),
        _ => None,
    }
}

/// Mutable counterpart of [`child`].
pub fn child_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => items.get_mut(key.parse::<usize>().ok()?),
        _ => None,
    }
}

/// Get the single value addressed by a path of keys.
///
/// An iterator marker addresses many locations, so it resolves to `None`.
pub fn get<'a>(value: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = child(current, segment.as_key()?)?;
    }
    Some(current)
}

/// Get a mutable reference to the single value addressed by a path of keys.
pub fn get_mut<'a>(value: &'a mut Value, path: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in path {
        current = child_mut(current, segment.as_key()?)?;
    }
    Some(current)
}

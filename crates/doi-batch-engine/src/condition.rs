//! Condition evaluation: does any location on a path match a regex?

use doi_batch_path::{child, Segment};
use regex::Regex;
use serde_json::Value;

use crate::util::value_text;

/// Test `pattern` against the value(s) found along `path`.
///
/// An iterator segment holds if *any* element satisfies the rest of the
/// path. Missing keys, wrong container kinds, `null` values and an empty
/// path all evaluate to `false`.
pub fn matches(current: &Value, path: &[Segment], pattern: &Regex) -> bool {
    let Some((head, rest)) = path.split_first() else {
        return false;
    };
    if current.is_null() {
        return false;
    }
    match head {
        Segment::Each => match current {
            Value::Array(items) => items.iter().any(|item| matches(item, rest, pattern)),
            _ => false,
        },
        Segment::Key(key) => {
            let Some(value) = child(current, key) else {
                return false;
            };
            if rest.is_empty() {
                !value.is_null() && pattern.is_match(&value_text(value))
            } else {
                matches(value, rest, pattern)
            }
        }
    }
}

//! Value extraction: collect regex captures found along a path.

use doi_batch_path::{child, Segment};
use regex::Regex;
use serde_json::Value;

use crate::util::value_text;

/// Collect the first capture group (or the whole match when the regex has
/// no groups) of every location on `path` that matches `pattern`.
///
/// Results of all list elements are concatenated in document order;
/// locations that do not match contribute nothing.
pub fn extract(current: &Value, path: &[Segment], pattern: &Regex) -> Vec<String> {
    let mut out = Vec::new();
    extract_into(current, path, pattern, &mut out);
    out
}

fn extract_into(current: &Value, path: &[Segment], pattern: &Regex, out: &mut Vec<String>) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    if current.is_null() {
        return;
    }
    match head {
        Segment::Each => {
            if let Value::Array(items) = current {
                for item in items {
                    extract_into(item, rest, pattern, out);
                }
            }
        }
        Segment::Key(key) => {
            let Some(value) = child(current, key) else {
                return;
            };
            if !rest.is_empty() {
                extract_into(value, rest, pattern, out);
                return;
            }
            if value.is_null() {
                return;
            }
            let text = value_text(value);
            if let Some(captures) = pattern.captures(&text) {
                if let Some(found) = captures.get(1).or_else(|| captures.get(0)) {
                    out.push(found.as_str().to_string());
                }
            }
        }
    }
}

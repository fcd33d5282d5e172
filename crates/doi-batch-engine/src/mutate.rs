//! Path-directed mutation of an attribute document.

use doi_batch_path::{child_mut, Segment};
use regex::Regex;
use serde_json::{Map, Value};

use crate::status::{normalize_state, resolve_event, WorkflowEvent, WorkflowState};
use crate::util::value_text;

/// Key holding the record's current workflow state.
pub const STATE_KEY: &str = "state";

/// Key receiving the workflow event to send to the registry.
pub const EVENT_KEY: &str = "event";

/// Apply a substitution or replacement at every location on `path`.
///
/// Returns `true` iff the document changed. Missing intermediate
/// containers are created on the way down (a list when the next segment is
/// the iterator marker, an object otherwise) and removed again when nothing
/// below them changed, so an unchanged result leaves the document intact.
pub fn apply(
    current: &mut Value,
    path: &[Segment],
    pattern: Option<&Regex>,
    replacement: &Value,
) -> bool {
    let Some((head, rest)) = path.split_first() else {
        return false;
    };
    match head {
        Segment::Each => match current {
            // Every element is visited, even after one has changed.
            Value::Array(items) => items.iter_mut().fold(false, |changed, item| {
                apply(item, rest, pattern, replacement) || changed
            }),
            _ => false,
        },
        Segment::Key(key) if rest.is_empty() => apply_leaf(current, key, pattern, replacement),
        Segment::Key(key) => {
            if let Value::Object(map) = current {
                return apply_in_object(map, key, rest, pattern, replacement);
            }
            match child_mut(current, key) {
                Some(item) => apply(item, rest, pattern, replacement),
                None => false,
            }
        }
    }
}

fn apply_in_object(
    map: &mut Map<String, Value>,
    key: &str,
    rest: &[Segment],
    pattern: Option<&Regex>,
    replacement: &Value,
) -> bool {
    let vivify = matches!(map.get(key), None | Some(Value::Null));
    let previous = if vivify {
        let container = if rest.first().is_some_and(Segment::is_each) {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
        Some(map.insert(key.to_string(), container))
    } else {
        None
    };

    let changed = match map.get_mut(key) {
        Some(next) => apply(next, rest, pattern, replacement),
        None => false,
    };

    if !changed {
        match previous {
            Some(Some(old)) => {
                map.insert(key.to_string(), old);
            }
            Some(None) => {
                map.remove(key);
            }
            None => {}
        }
    }
    changed
}

fn apply_leaf(current: &mut Value, key: &str, pattern: Option<&Regex>, replacement: &Value) -> bool {
    if let Value::Object(map) = current {
        if is_workflow_key(key) {
            return apply_workflow(map, pattern, replacement);
        }
        let Some(next) = substituted(map.get(key), pattern, replacement) else {
            return false;
        };
        if map.get(key) == Some(&next) {
            return false;
        }
        map.insert(key.to_string(), next);
        return true;
    }
    // List elements can be addressed by index but are never created.
    let Some(slot) = child_mut(current, key) else {
        return false;
    };
    match substituted(Some(&*slot), pattern, replacement) {
        Some(next) if *slot != next => {
            *slot = next;
            true
        }
        _ => false,
    }
}

/// Compute the new leaf value, or `None` when the operation does not apply.
fn substituted(original: Option<&Value>, pattern: Option<&Regex>, replacement: &Value) -> Option<Value> {
    match (pattern, original) {
        (Some(re), Some(Value::String(text))) => {
            let with = value_text(replacement);
            Some(Value::String(re.replace_all(text, with.as_ref()).into_owned()))
        }
        (Some(_), _) => None,
        (None, _) => Some(replacement.clone()),
    }
}

fn is_workflow_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(STATE_KEY) || key.eq_ignore_ascii_case(EVENT_KEY)
}

/// Writing to `state`/`event` emits a workflow event rather than editing
/// the state label.
///
/// The pattern, when given, must equal the recorded state
/// (case-insensitive). A `findable` record can only be hidden, whatever
/// target was requested.
fn apply_workflow(record: &mut Map<String, Value>, pattern: Option<&Regex>, replacement: &Value) -> bool {
    let Some(requested) = replacement.as_str().and_then(resolve_event) else {
        return false;
    };
    let recorded = match record.get(STATE_KEY) {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value).to_lowercase(),
    };
    if let Some(re) = pattern {
        if recorded != re.as_str().to_lowercase() {
            return false;
        }
    }
    let event = if normalize_state(&recorded) == WorkflowState::Findable {
        WorkflowEvent::Hide
    } else {
        requested
    };
    let next = Value::String(event.as_str().to_string());
    if record.get(EVENT_KEY) == Some(&next) {
        return false;
    }
    record.insert(EVENT_KEY.to_string(), next);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use doi_batch_path::parse_path;
    use serde_json::json;

    fn run(doc: &mut Value, path: &str, pattern: Option<&str>, replacement: Value) -> bool {
        let re = pattern.map(|p| Regex::new(p).unwrap());
        apply(doc, parse_path(path).segments(), re.as_ref(), &replacement)
    }

    #[test]
    fn test_substitute_in_every_element() {
        let mut doc = json!({"titles": [{"title": "Old title"}, {"title": "Another"}, {"title": "Old"}]});
        assert!(run(&mut doc, "titles[].title", Some("Old"), json!("New")));
        assert_eq!(
            doc,
            json!({"titles": [{"title": "New title"}, {"title": "Another"}, {"title": "New"}]})
        );
    }

    #[test]
    fn test_substitution_is_global_and_expands_groups() {
        let mut doc = json!({"v": "a-b-c"});
        assert!(run(&mut doc, "v", Some("-"), json!("_")));
        assert_eq!(doc["v"], "a_b_c");

        let mut doc = json!({"name": "Doe, Jane"});
        assert!(run(&mut doc, "name", Some(r"^(\w+), (\w+)$"), json!("$2 $1")));
        assert_eq!(doc["name"], "Jane Doe");
    }

    #[test]
    fn test_pattern_on_non_string_leaves_value() {
        let mut doc = json!({"publicationYear": 2020});
        assert!(!run(&mut doc, "publicationYear", Some("2020"), json!("2021")));
        assert_eq!(doc, json!({"publicationYear": 2020}));
    }

    #[test]
    fn test_whole_value_replacement_with_object() {
        let mut doc = json!({"types": {"resourceTypeGeneral": "Text"}});
        let types = json!({"resourceTypeGeneral": "Dataset", "resourceType": "Survey"});
        assert!(run(&mut doc, "types", None, types.clone()));
        assert_eq!(doc["types"], types);
        assert!(!run(&mut doc, "types", None, types));
    }

    #[test]
    fn test_vivify_map_and_list() {
        let mut doc = json!({"doi": "10.5072/x"});
        assert!(run(&mut doc, "publisher.name", None, json!("Zenodo")));
        assert_eq!(doc, json!({"doi": "10.5072/x", "publisher": {"name": "Zenodo"}}));
    }

    #[test]
    fn test_vivified_containers_removed_when_unchanged() {
        let mut doc = json!({"doi": "10.5072/x"});
        assert!(!run(&mut doc, "subjects[].subject", None, json!("Physics")));
        assert!(!run(&mut doc, "a.b.c", Some("x"), json!("y")));
        assert_eq!(doc, json!({"doi": "10.5072/x"}));

        let mut doc = json!({"publisher": null});
        assert!(!run(&mut doc, "publisher.name", Some("x"), json!("y")));
        assert_eq!(doc, json!({"publisher": null}));
    }

    #[test]
    fn test_mismatched_container_is_a_miss() {
        let mut doc = json!({"titles": "plain"});
        assert!(!run(&mut doc, "titles[].title", None, json!("x")));
        assert!(!run(&mut doc, "titles.title", None, json!("x")));
        assert_eq!(doc, json!({"titles": "plain"}));
    }

    #[test]
    fn test_list_index_key() {
        let mut doc = json!({"titles": [{"title": "A"}, {"title": "B"}], "tags": ["x", "y"]});
        assert!(run(&mut doc, "titles.1.title", None, json!("C")));
        assert!(run(&mut doc, "tags.0", None, json!("z")));
        assert!(!run(&mut doc, "tags.5", None, json!("z")));
        assert_eq!(doc, json!({"titles": [{"title": "A"}, {"title": "C"}], "tags": ["z", "y"]}));
    }

    #[test]
    fn test_workflow_requires_matching_state() {
        let mut doc = json!({"state": "Draft"});
        assert!(!run(&mut doc, "state", Some("registered"), json!("findable")));
        assert!(doc.get("event").is_none());

        assert!(run(&mut doc, "state", Some("draft"), json!("findable")));
        assert_eq!(doc, json!({"state": "Draft", "event": "publish"}));
    }

    #[test]
    fn test_workflow_findable_forces_hide() {
        let mut doc = json!({"state": "findable"});
        assert!(run(&mut doc, "event", None, json!("register")));
        assert_eq!(doc["event"], "hide");
    }

    #[test]
    fn test_workflow_rejects_unknown_target() {
        let mut doc = json!({"state": "draft"});
        assert!(!run(&mut doc, "state", None, json!("archived")));
        assert!(!run(&mut doc, "state", None, json!({"event": "publish"})));
        assert_eq!(doc, json!({"state": "draft"}));
    }

    #[test]
    fn test_workflow_is_idempotent() {
        let mut doc = json!({"state": "registered"});
        assert!(run(&mut doc, "State", None, json!("publish")));
        assert!(!run(&mut doc, "State", None, json!("publish")));
        assert_eq!(doc, json!({"state": "registered", "event": "publish"}));
    }
}

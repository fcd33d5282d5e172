//! Applies one operation, aligning its condition with the list element
//! being mutated when both paths iterate the same list.

use doi_batch_path::{get_mut, shared_list_context, Segment};
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::condition::matches;
use crate::extract::extract;
use crate::mutate;
use crate::operation::Operation;

/// Apply `operation` to `document`; returns `true` iff anything changed.
///
/// When the target and the condition share a list prefix, each element of
/// that list becomes the root for both, so a condition satisfied by one
/// element never licenses a change to another.
pub fn apply_operation(document: &mut Value, operation: &Operation) -> bool {
    let condition = operation
        .condition
        .as_ref()
        .map(|c| (c.attribute.segments(), &c.pattern));
    apply_scoped(document, operation.attribute.segments(), condition, operation)
}

fn apply_scoped(
    current: &mut Value,
    target: &[Segment],
    condition: Option<(&[Segment], &Regex)>,
    operation: &Operation,
) -> bool {
    if let Some((condition_path, pattern)) = condition {
        if let Some(context) = shared_list_context(target, condition_path) {
            let Some(Value::Array(items)) = get_mut(current, context.prefix) else {
                return false;
            };
            trace!(elements = items.len(), "aligning condition with list elements");
            // An empty remainder leaves nothing to test inside the element.
            let inner = (!context.condition_rest.is_empty()).then_some((context.condition_rest, pattern));
            return items.iter_mut().fold(false, |changed, item| {
                apply_scoped(item, context.target_rest, inner, operation) || changed
            });
        }
        if !matches(current, condition_path, pattern) {
            return false;
        }
    }

    match condition {
        Some((condition_path, pattern)) if operation.has_blank_replacement() => {
            let Some(value) = extract(current, condition_path, pattern).into_iter().next() else {
                return false;
            };
            mutate::apply(current, target, None, &Value::String(value))
        }
        _ => mutate::apply(current, target, operation.pattern.as_ref(), &operation.replacement),
    }
}

use crate::types::{first_iterator, RecordPath, Segment, ITERATOR_MARKER};

/// Parse a dotted path string into segments.
///
/// The iterator marker `[]` is always its own segment, whatever dots sit
/// around it, so `a[].b`, `a.[].b` and `a[]b` are the same path. Empty
/// pieces produced by leading, trailing or doubled dots are dropped. There
/// is no escaping: a key containing `.` or `[]` cannot be addressed.
pub fn parse_path(path: &str) -> RecordPath {
    path.replace(ITERATOR_MARKER, ".[].")
        .split('.')
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            if piece == ITERATOR_MARKER {
                Segment::Each
            } else {
                Segment::Key(piece.to_string())
            }
        })
        .collect()
}

/// Format segments back into the compact dotted form (`a[].b`).
pub fn format_path(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Key(name) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Each => out.push_str(ITERATOR_MARKER),
        }
    }
    out
}

/// Two paths that cross the same list at the same depth.
///
/// `prefix` holds the literal keys leading to the shared list; the two
/// remainders continue from inside a single element of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedListContext<'a> {
    pub prefix: &'a [Segment],
    pub target_rest: &'a [Segment],
    pub condition_rest: &'a [Segment],
}

/// Detect whether `target` and `condition` iterate the same list.
///
/// Returns `None` unless both paths have their first iterator marker at
/// the same position behind an identical run of keys.
pub fn shared_list_context<'a>(
    target: &'a [Segment],
    condition: &'a [Segment],
) -> Option<SharedListContext<'a>> {
    let at = first_iterator(target)?;
    if first_iterator(condition)? != at || target[..at] != condition[..at] {
        return None;
    }
    Some(SharedListContext {
        prefix: &target[..at],
        target_rest: &target[at + 1..],
        condition_rest: &condition[at + 1..],
    })
}

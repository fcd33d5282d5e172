//! Type definitions for record paths.

use std::fmt;
use std::str::FromStr;

/// The literal substring that marks "each element of the list here".
pub const ITERATOR_MARKER: &str = "[]";

/// A single step in a record path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key (or, on a list, a decimal element index).
    Key(String),
    /// List iterator: every element of the list at this position.
    Each,
}

impl Segment {
    pub fn key(name: impl Into<String>) -> Self {
        Segment::Key(name.into())
    }

    pub fn is_each(&self) -> bool {
        matches!(self, Segment::Each)
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(name) => Some(name),
            Segment::Each => None,
        }
    }
}

/// A parsed record path such as `creators[].nameIdentifiers[].nameIdentifier`.
///
/// Paths are immutable once built; traversal code works on the
/// [`segments`](RecordPath::segments) slice and recurses on its tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RecordPath {
    segments: Vec<Segment>,
}

impl RecordPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Position of the first iterator marker, if the path crosses a list.
    pub fn first_iterator(&self) -> Option<usize> {
        first_iterator(&self.segments)
    }
}

pub(crate) fn first_iterator(segments: &[Segment]) -> Option<usize> {
    segments.iter().position(Segment::is_each)
}

impl From<Vec<Segment>> for RecordPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<Segment> for RecordPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromStr for RecordPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(crate::parse_path(s))
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format_path(&self.segments))
    }
}

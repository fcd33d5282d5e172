use std::fmt;

use thiserror::Error;

/// Which regex field of an operation failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternField {
    Pattern,
    ConditionPattern,
}

impl fmt::Display for PatternField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatternField::Pattern => "pattern",
            PatternField::ConditionPattern => "condition pattern",
        })
    }
}

/// A single operation is structurally invalid.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("requires an attribute path")]
    MissingAttribute,

    #[error("has a condition pattern without an attribute")]
    ConditionWithoutAttribute,

    #[error("has an invalid {field}: {pattern}")]
    InvalidRegex {
        field: PatternField,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A list of operations cannot be run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("At least one operation is required.")]
    EmptyBatch,

    #[error("Operation {number} {source}.", number = .index + 1)]
    Operation {
        index: usize,
        #[source]
        source: OperationError,
    },

    #[error("Invalid operations payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BatchError {
    /// Zero-based index of the offending operation, when there is one.
    pub fn operation_index(&self) -> Option<usize> {
        match self {
            BatchError::Operation { index, .. } => Some(*index),
            _ => None,
        }
    }
}

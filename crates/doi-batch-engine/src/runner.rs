//! Runs an ordered list of operations against one document.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::align::apply_operation;
use crate::error::BatchError;
use crate::operation::{compile_operations, Operation, OperationSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOutcome {
    Changed,
    NoChange,
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationOutcome::Changed => "changed",
            OperationOutcome::NoChange => "no change",
        })
    }
}

/// Result of running a batch of operations on one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    /// `true` iff at least one operation changed the document.
    pub updated: bool,
    /// One human-readable line per operation, in order.
    pub log: Vec<String>,
    #[serde(skip)]
    pub outcomes: Vec<OperationOutcome>,
}

impl ChangeReport {
    fn record(&mut self, index: usize, outcome: OperationOutcome) {
        self.updated |= outcome == OperationOutcome::Changed;
        self.log.push(format!("Operation {}: {outcome}", index + 1));
        self.outcomes.push(outcome);
    }
}

/// Apply `operations` in order to the same, progressively mutated document.
///
/// Later operations observe the effects of earlier ones.
pub fn run(document: &mut Value, operations: &[Operation]) -> ChangeReport {
    let mut report = ChangeReport::default();
    for (index, operation) in operations.iter().enumerate() {
        let outcome = if apply_operation(document, operation) {
            OperationOutcome::Changed
        } else {
            OperationOutcome::NoChange
        };
        debug!(index, attribute = %operation.attribute, %outcome, "operation applied");
        report.record(index, outcome);
    }
    report
}

/// Compile `specs` and run them; nothing is touched if any spec is invalid.
pub fn run_specs(document: &mut Value, specs: &[OperationSpec]) -> Result<ChangeReport, BatchError> {
    let operations = compile_operations(specs)?;
    Ok(run(document, &operations))
}

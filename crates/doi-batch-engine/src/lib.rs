//! Batch attribute-mutation engine for DOI metadata records.
//!
//! Given an attribute document and an ordered list of operations, each
//! combining a target path, an optional regex substitution and an optional
//! condition, the engine decides whether and how to mutate the document.
//!
//! # Example
//!
//! ```
//! use doi_batch_engine::{run_specs, OperationSpec};
//! use serde_json::json;
//!
//! let mut attributes = json!({
//!     "items": [{"name": "keep", "val": "1"}, {"name": "change", "val": "2"}]
//! });
//! let operations = vec![OperationSpec::new("items[].val")
//!     .with_pattern("2")
//!     .with_replacement("9")
//!     .with_condition("items[].name", "^change$")];
//!
//! let report = run_specs(&mut attributes, &operations).unwrap();
//! assert!(report.updated);
//! assert_eq!(attributes["items"][0]["val"], "1");
//! assert_eq!(attributes["items"][1]["val"], "9");
//! ```

pub mod error;
pub use error::{BatchError, OperationError, PatternField};

pub mod status;
pub use status::{event_for_state, normalize_state, resolve_event, WorkflowEvent, WorkflowState};

pub mod operation;
pub use operation::{
    compile_batch, compile_operations, parse_operations, validate_operations, Condition,
    ConditionSpec, Operation, OperationSpec,
};

mod util;
pub use util::value_text;

pub mod condition;
pub use condition::matches;

pub mod extract;
pub use extract::extract;

pub mod mutate;

pub mod align;
pub use align::apply_operation;

pub mod runner;
pub use runner::{run, run_specs, ChangeReport, OperationOutcome};

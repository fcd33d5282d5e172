//! Batch editing of DOI metadata records.
//!
//! The mutation engine lives in [`doi_batch_engine`]; this crate adds the
//! record model, the sequential batch driver with dry-run and confirmed
//! live modes, a JSON file backed record store and the `doi-batch` CLI.
//!
//! # Example
//!
//! ```
//! use doi_batch::{BatchDriver, JsonFileStore, Record, RunMode};
//! use doi_batch_engine::{compile_batch, OperationSpec};
//! use serde_json::json;
//!
//! let operations = compile_batch(&[OperationSpec::new("publisher")
//!     .with_pattern("Old")
//!     .with_replacement("New")])
//! .unwrap();
//! let mut store = JsonFileStore::new(
//!     vec![
//!         Record::new("10.5072/a", json!({"publisher": "Old Press"})),
//!         Record::new("10.5072/b", json!({"publisher": "Other"})),
//!     ],
//!     10,
//! );
//!
//! let summary = BatchDriver::new(&operations, RunMode::DryRun).run(&mut store).unwrap();
//! assert_eq!(summary.checked, 2);
//! assert_eq!(summary.affected, vec!["10.5072/a".to_string()]);
//! ```

pub use doi_batch_engine as engine;

pub mod error;
pub use error::StoreError;

pub mod record;
pub use record::{records_from_json, records_to_json, Record, RecordSummary};

pub mod driver;
pub use driver::{BatchDriver, BatchSummary, CancelFlag, LiveConfirmation, RecordStore, RunMode};

pub mod store;
pub use store::JsonFileStore;

pub mod cli;

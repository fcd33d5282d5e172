//! Sequential batch driver: pages through records, runs the engine on a
//! copy of each, and persists changed records one at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use doi_batch_engine::{run, Operation};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::record::Record;

/// Paginated record retrieval plus single-record persistence.
pub trait RecordStore {
    /// Fetch the next page of records; `None` once exhausted.
    fn next_page(&mut self) -> Result<Option<Vec<Record>>, StoreError>;

    /// Persist a record's new attributes.
    fn update(&mut self, id: &str, attributes: &Value) -> Result<(), StoreError>;
}

/// Proof that an operator confirmed a live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveConfirmation(());

impl LiveConfirmation {
    /// Confirmation given up front (e.g. a `--yes` flag).
    pub fn granted() -> Self {
        LiveConfirmation(())
    }

    /// Interpret an interactive answer; only `y` / `yes` confirm.
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(LiveConfirmation(())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    DryRun,
    Live(LiveConfirmation),
}

impl RunMode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

/// Cooperative cancellation, observed between records.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub dry_run: bool,
    pub checked: usize,
    pub changed_in_memory: usize,
    /// Records that would change (dry run only).
    pub affected: Vec<String>,
    /// Records persisted successfully (live run only).
    pub updated: Vec<String>,
    /// Records whose persistence failed (live run only).
    pub failed: Vec<String>,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("DOIs checked: {}", self.checked),
            format!("Changed in memory: {}", self.changed_in_memory),
        ];
        if self.dry_run {
            lines.push("Dry run - changes not applied.".to_string());
        } else {
            lines.push(format!("Updated on API: {}", self.updated.len()));
            if !self.failed.is_empty() {
                lines.push(format!("Failed on API: {}", self.failed.len()));
            }
        }
        if self.cancelled {
            lines.push("Cancelled before all records were checked.".to_string());
        }
        lines
    }
}

pub struct BatchDriver<'a> {
    operations: &'a [Operation],
    mode: RunMode,
    cancel: CancelFlag,
}

impl<'a> BatchDriver<'a> {
    pub fn new(operations: &'a [Operation], mode: RunMode) -> Self {
        Self {
            operations,
            mode,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process every record the store yields, in order.
    ///
    /// A failed page fetch aborts the batch; a failed update is recorded
    /// and processing continues with the next record.
    pub fn run<S: RecordStore>(&self, store: &mut S) -> Result<BatchSummary, StoreError> {
        let mut summary = BatchSummary {
            dry_run: self.mode.is_dry_run(),
            ..BatchSummary::default()
        };
        info!(dry_run = summary.dry_run, operations = self.operations.len(), "starting batch update");

        'pages: while let Some(page) = self.next_page(store, &mut summary)? {
            for record in page {
                if self.observe_cancel(&mut summary) {
                    break 'pages;
                }
                self.process(store, record, &mut summary);
            }
        }

        info!(
            checked = summary.checked,
            changed = summary.changed_in_memory,
            updated = summary.updated.len(),
            failed = summary.failed.len(),
            cancelled = summary.cancelled,
            "batch update finished"
        );
        Ok(summary)
    }

    fn next_page<S: RecordStore>(
        &self,
        store: &mut S,
        summary: &mut BatchSummary,
    ) -> Result<Option<Vec<Record>>, StoreError> {
        if self.observe_cancel(summary) {
            return Ok(None);
        }
        store.next_page()
    }

    fn observe_cancel(&self, summary: &mut BatchSummary) -> bool {
        if self.cancel.is_cancelled() && !summary.cancelled {
            info!(checked = summary.checked, "cancellation requested, stopping");
            summary.cancelled = true;
        }
        summary.cancelled
    }

    fn process<S: RecordStore>(&self, store: &mut S, record: Record, summary: &mut BatchSummary) {
        summary.checked += 1;
        let id = record.display_id().to_string();
        let mut attributes = record.attributes;

        let report = run(&mut attributes, self.operations);
        if !report.updated {
            debug!(%id, "no changes");
            return;
        }
        summary.changed_in_memory += 1;

        match self.mode {
            RunMode::DryRun => {
                info!(%id, log = ?report.log, "[dry run] would update");
                summary.affected.push(id);
            }
            RunMode::Live(_) => match store.update(&id, &attributes) {
                Ok(()) => {
                    info!(%id, "updated");
                    summary.updated.push(id);
                }
                Err(e) => {
                    warn!(%id, error = %e, "failed to update");
                    summary.failed.push(id);
                }
            },
        }
    }
}

//! Run persistence.
//!
//! The pipeline talks to storage only through [`RunStore`]. Writes are
//! idempotent: outcomes are upserted by check id, and summaries replace the
//! previous one, so a retried phase leaves the same state behind.

pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};

use crate::checks::CheckOutcome;
use crate::error::Result;
use crate::lifecycle::{RunId, RunRecord, RunSummary};

pub use file::FileRunStore;
pub use memory::MemoryRunStore;

/// Storage for run records and their outcomes.
pub trait RunStore: Send + Sync {
    /// Persist a new run record.
    fn create_run(&self, record: &RunRecord) -> Result<()>;

    /// Upsert outcomes by check id.
    fn write_outcomes(&self, run_id: &RunId, outcomes: &[CheckOutcome]) -> Result<()>;

    /// Apply a phase summary; fails on an illegal lifecycle transition.
    fn update_run_summary(&self, run_id: &RunId, summary: &RunSummary) -> Result<()>;

    /// Move a run to `failed` with a message.
    fn mark_failed(&self, run_id: &RunId, message: &str) -> Result<()>;

    fn load_run(&self, run_id: &RunId) -> Result<RunRecord>;

    fn load_outcomes(&self, run_id: &RunId) -> Result<Vec<CheckOutcome>>;

    /// All runs, newest first.
    fn list_runs(&self) -> Result<Vec<RunRecord>>;

    /// Runs still `running` that started before `cutoff`.
    fn stale_running_runs(&self, cutoff: DateTime<Utc>) -> Result<Vec<RunRecord>> {
        Ok(self
            .list_runs()?
            .into_iter()
            .filter(|run| run.is_stale(cutoff))
            .collect())
    }
}

/// Merge `incoming` into `existing`, replacing outcomes with the same
/// check id in place and appending the rest.
pub(crate) fn upsert_outcomes(existing: &mut Vec<CheckOutcome>, incoming: &[CheckOutcome]) {
    for outcome in incoming {
        match existing.iter_mut().find(|o| o.check_id == outcome.check_id) {
            Some(slot) => *slot = outcome.clone(),
            None => existing.push(outcome.clone()),
        }
    }
}

//! Startup sweep for runs orphaned by a previous process.

use chrono::{DateTime, Duration, Utc};

use super::RunId;
use crate::error::Result;
use crate::store::RunStore;

/// Message stored on runs failed by the sweep.
pub const RECOVERY_MESSAGE: &str = "Server restart during run, please resubmit";

/// What a sweep changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub recovered: Vec<RunId>,
    /// Stale runs that could not be marked, with the reason.
    pub failures: Vec<(RunId, String)>,
}

/// Fail every `running` run that started more than `stale_after` before
/// `now`.
///
/// Call before accepting new work: background work does not survive the
/// process, so a run still `running` at startup will never finish.
///
/// A run that cannot be marked (finished meanwhile by another process, or
/// an unwritable record) is logged and reported without stopping the
/// sweep. Only failing to list runs is an error.
pub fn recover_stale_runs(
    store: &dyn RunStore,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> Result<RecoveryReport> {
    let cutoff = now - stale_after;
    let mut report = RecoveryReport::default();

    for run in store.stale_running_runs(cutoff)? {
        match store.mark_failed(&run.id, RECOVERY_MESSAGE) {
            Ok(()) => report.recovered.push(run.id),
            Err(e) => {
                tracing::warn!(run = %run.id, "could not recover stale run: {}", e);
                report.failures.push((run.id, e.to_string()));
            }
        }
    }

    if !report.recovered.is_empty() {
        tracing::info!(count = report.recovered.len(), "recovered stalled run(s)");
    }
    Ok(report)
}

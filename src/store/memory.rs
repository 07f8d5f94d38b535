//! In-process run store.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{upsert_outcomes, RunStore};
use crate::checks::CheckOutcome;
use crate::error::{LaunchproofError, Result};
use crate::lifecycle::{RunId, RunRecord, RunSummary};

#[derive(Default)]
struct Tables {
    runs: HashMap<RunId, RunRecord>,
    outcomes: HashMap<RunId, Vec<CheckOutcome>>,
}

/// Mutex-guarded maps; nothing survives the process.
#[derive(Default)]
pub struct MemoryRunStore {
    tables: Mutex<Tables>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_run<T>(
        &self,
        run_id: &RunId,
        f: impl FnOnce(&mut RunRecord) -> Result<T>,
    ) -> Result<T> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let record = tables
            .runs
            .get_mut(run_id)
            .ok_or_else(|| LaunchproofError::RunNotFound {
                id: run_id.to_string(),
            })?;
        f(record)
    }
}

impl RunStore for MemoryRunStore {
    fn create_run(&self, record: &RunRecord) -> Result<()> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.runs.insert(record.id.clone(), record.clone());
        tables.outcomes.entry(record.id.clone()).or_default();
        Ok(())
    }

    fn write_outcomes(&self, run_id: &RunId, outcomes: &[CheckOutcome]) -> Result<()> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        if !tables.runs.contains_key(run_id) {
            return Err(LaunchproofError::RunNotFound {
                id: run_id.to_string(),
            });
        }
        upsert_outcomes(tables.outcomes.entry(run_id.clone()).or_default(), outcomes);
        Ok(())
    }

    fn update_run_summary(&self, run_id: &RunId, summary: &RunSummary) -> Result<()> {
        self.with_run(run_id, |record| record.apply_summary(summary, Utc::now()))
    }

    fn mark_failed(&self, run_id: &RunId, message: &str) -> Result<()> {
        self.with_run(run_id, |record| record.fail(message, Utc::now()))
    }

    fn load_run(&self, run_id: &RunId) -> Result<RunRecord> {
        self.with_run(run_id, |record| Ok(record.clone()))
    }

    fn load_outcomes(&self, run_id: &RunId) -> Result<Vec<CheckOutcome>> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables
            .outcomes
            .get(run_id)
            .cloned()
            .ok_or_else(|| LaunchproofError::RunNotFound {
                id: run_id.to_string(),
            })
    }

    fn list_runs(&self) -> Result<Vec<RunRecord>> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let mut runs: Vec<RunRecord> = tables.runs.values().cloned().collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Category, CheckDefinition, CheckId, CheckStatus, Severity, Tier, Verdict};
    use crate::context::Platform;
    use crate::lifecycle::RunStatus;
    use std::time::Duration;

    fn outcome(id: &str, status: CheckStatus) -> CheckOutcome {
        let definition = CheckDefinition {
            check_id: CheckId::new(id),
            check_name: id.into(),
            category: Category::Utm,
            platforms: vec![Platform::Universal],
            severity: Severity::Major,
            tier: Tier::Compute,
        };
        CheckOutcome::new(&definition, Verdict::new(status, "m"), Duration::ZERO)
    }

    #[test]
    fn unknown_run_is_not_found() {
        let store = MemoryRunStore::new();
        let err = store.load_run(&RunId::new()).unwrap_err();
        assert!(matches!(err, LaunchproofError::RunNotFound { .. }));
    }

    #[test]
    fn retried_writes_do_not_duplicate() {
        let store = MemoryRunStore::new();
        let record = RunRecord::new(RunId::new(), "u", "r", Platform::Meta);
        store.create_run(&record).unwrap();

        store
            .write_outcomes(&record.id, &[outcome("a", CheckStatus::Failed)])
            .unwrap();
        store
            .write_outcomes(
                &record.id,
                &[outcome("a", CheckStatus::Passed), outcome("b", CheckStatus::Passed)],
            )
            .unwrap();

        let outcomes = store.load_outcomes(&record.id).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, CheckStatus::Passed);
    }

    #[test]
    fn summary_transition_enforced() {
        let store = MemoryRunStore::new();
        let record = RunRecord::new(RunId::new(), "u", "r", Platform::Meta);
        store.create_run(&record).unwrap();

        let done = RunSummary::from_outcomes(RunStatus::Completed, &[]);
        assert!(store.update_run_summary(&record.id, &done).is_err());
        assert_eq!(store.load_run(&record.id).unwrap().status, RunStatus::Pending);
    }
}

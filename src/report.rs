//! Read-only report projection over a stored run.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::checks::{Category, CheckOutcome, CheckStatus, Severity};
use crate::error::Result;
use crate::lifecycle::{RunId, RunRecord, StatusCounts};
use crate::store::RunStore;

/// A run with its outcomes, ordered for display.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run: RunRecord,
    pub progress_pct: u8,
    /// Outcomes ordered by severity, then by how actionable the status is.
    pub outcomes: Vec<CheckOutcome>,
    pub by_category: BTreeMap<Category, StatusCounts>,
    /// Names of failed critical checks.
    pub critical_failures: Vec<String>,
    pub errors: usize,
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Critical => 0,
        Severity::Major => 1,
        Severity::Minor => 2,
    }
}

fn status_rank(status: CheckStatus) -> u8 {
    match status {
        CheckStatus::Failed => 0,
        CheckStatus::Warning => 1,
        CheckStatus::Error => 2,
        CheckStatus::Passed => 3,
        CheckStatus::Skipped => 4,
    }
}

impl RunReport {
    /// Build a report from a record and its outcomes.
    pub fn new(run: RunRecord, mut outcomes: Vec<CheckOutcome>) -> Self {
        outcomes.sort_by(|a, b| {
            severity_rank(a.severity)
                .cmp(&severity_rank(b.severity))
                .then(status_rank(a.status).cmp(&status_rank(b.status)))
                .then(a.check_id.cmp(&b.check_id))
        });

        let mut grouped: BTreeMap<Category, Vec<CheckOutcome>> = BTreeMap::new();
        for outcome in &outcomes {
            grouped.entry(outcome.category).or_default().push(outcome.clone());
        }
        let by_category = grouped
            .into_iter()
            .map(|(category, list)| (category, StatusCounts::tally(&list)))
            .collect();

        let critical_failures = outcomes
            .iter()
            .filter(|o| o.severity == Severity::Critical && o.status == CheckStatus::Failed)
            .map(|o| o.check_name.clone())
            .collect();
        let errors = outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::Error)
            .count();

        Self {
            progress_pct: run.status.progress_pct(),
            run,
            outcomes,
            by_category,
            critical_failures,
            errors,
        }
    }

    /// Load and build the report for `run_id`.
    pub fn load(store: &dyn RunStore, run_id: &RunId) -> Result<Self> {
        let run = store.load_run(run_id)?;
        let outcomes = store.load_outcomes(run_id)?;
        Ok(Self::new(run, outcomes))
    }
}

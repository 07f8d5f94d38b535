//! Aggregate view of a run's outcomes.

use serde::{Deserialize, Serialize};

use super::RunStatus;
use crate::checks::{CheckOutcome, CheckStatus};
use crate::scoring::readiness_score;

/// Outcome counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warning: usize,
    pub skipped: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn tally(outcomes: &[CheckOutcome]) -> Self {
        let mut counts = Self {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.status {
                CheckStatus::Passed => counts.passed += 1,
                CheckStatus::Failed => counts.failed += 1,
                CheckStatus::Warning => counts.warning += 1,
                CheckStatus::Skipped => counts.skipped += 1,
                CheckStatus::Error => counts.error += 1,
            }
        }
        counts
    }
}

/// Summary written after each phase, or when the run fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub counts: StatusCounts,
    pub readiness_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RunSummary {
    /// Summarize `outcomes` under the given lifecycle status.
    pub fn from_outcomes(status: RunStatus, outcomes: &[CheckOutcome]) -> Self {
        Self {
            status,
            counts: StatusCounts::tally(outcomes),
            readiness_score: Some(readiness_score(outcomes)),
            error_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Category, CheckDefinition, CheckId, Severity, Tier, Verdict};
    use crate::context::Platform;
    use std::time::Duration;

    fn outcome(id: &str, status: CheckStatus) -> CheckOutcome {
        let definition = CheckDefinition {
            check_id: CheckId::new(id),
            check_name: id.into(),
            category: Category::Url,
            platforms: vec![Platform::Universal],
            severity: Severity::Critical,
            tier: Tier::Compute,
        };
        CheckOutcome::new(&definition, Verdict::new(status, "m"), Duration::ZERO)
    }

    #[test]
    fn tallies_each_status() {
        let outcomes = vec![
            outcome("a", CheckStatus::Passed),
            outcome("b", CheckStatus::Failed),
            outcome("c", CheckStatus::Warning),
            outcome("d", CheckStatus::Skipped),
            outcome("e", CheckStatus::Error),
            outcome("f", CheckStatus::Passed),
        ];
        let counts = StatusCounts::tally(&outcomes);
        assert_eq!(counts.total, 6);
        assert_eq!(counts.passed, 2);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.warning, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.error, 1);
    }

    #[test]
    fn summary_carries_score() {
        let summary = RunSummary::from_outcomes(
            RunStatus::Running,
            &[outcome("a", CheckStatus::Passed), outcome("b", CheckStatus::Failed)],
        );
        assert_eq!(summary.readiness_score, Some(50.0));
        assert_eq!(summary.status, RunStatus::Running);
    }
}

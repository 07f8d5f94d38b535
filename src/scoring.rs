//! Readiness score.
//!
//! A weighted pass rate over scored outcomes: critical checks weigh 4,
//! major 2, minor 1. A warning earns half its weight. Skipped and error
//! outcomes count toward neither side, so a run where nothing could be
//! evaluated scores 100.
//!
//! The percentage is rounded to one decimal, half to even, judged on the
//! exact binary value of the percentage. `6.25` becomes `6.2` while
//! `18.75` becomes `18.8`.

use crate::checks::{CheckOutcome, CheckStatus};

/// Score for a set of outcomes, in `0.0..=100.0`, rounded to one decimal.
pub fn readiness_score(outcomes: &[CheckOutcome]) -> f64 {
    let mut possible = 0.0_f64;
    let mut earned = 0.0_f64;

    for outcome in outcomes.iter().filter(|o| o.status.is_scored()) {
        let weight = f64::from(outcome.severity.weight());
        possible += weight;
        earned += match outcome.status {
            CheckStatus::Passed => weight,
            CheckStatus::Warning => weight * 0.5,
            _ => 0.0,
        };
    }

    if possible == 0.0 {
        return 100.0;
    }
    round_tenth_half_even(earned / possible * 100.0)
}

/// Round to one decimal, ties to the even tenth.
///
/// `mul_add` keeps `x * 10 - (floor + 0.5)` to a single rounding, so its
/// sign is exact and a tie is detected only when `x * 10` truly ends in `.5`.
fn round_tenth_half_even(x: f64) -> f64 {
    let floor = (x * 10.0).floor();
    let diff = x.mul_add(10.0, -(floor + 0.5));
    let tenths = if diff > 0.0 {
        floor + 1.0
    } else if diff < 0.0 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    tenths / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Category, CheckDefinition, CheckId, Severity, Tier, Verdict};
    use crate::context::Platform;
    use std::time::Duration;

    fn outcome(severity: Severity, status: CheckStatus) -> CheckOutcome {
        let definition = CheckDefinition {
            check_id: CheckId::new(format!("{:?}_{:?}", severity, status)),
            check_name: "Test".into(),
            category: Category::Utm,
            platforms: vec![Platform::Universal],
            severity,
            tier: Tier::Compute,
        };
        CheckOutcome::new(&definition, Verdict::new(status, "msg"), Duration::ZERO)
    }

    #[test]
    fn empty_scores_full() {
        assert_eq!(readiness_score(&[]), 100.0);
    }

    #[test]
    fn all_skipped_or_error_scores_full() {
        let outcomes = vec![
            outcome(Severity::Critical, CheckStatus::Skipped),
            outcome(Severity::Major, CheckStatus::Error),
        ];
        assert_eq!(readiness_score(&outcomes), 100.0);
    }

    #[test]
    fn all_failed_scores_zero() {
        let outcomes = vec![
            outcome(Severity::Critical, CheckStatus::Failed),
            outcome(Severity::Minor, CheckStatus::Failed),
        ];
        assert_eq!(readiness_score(&outcomes), 0.0);
    }

    #[test]
    fn weights_by_severity() {
        // earned 2 + 1 = 3 of 4 + 2 + 1 = 7
        let outcomes = vec![
            outcome(Severity::Critical, CheckStatus::Failed),
            outcome(Severity::Major, CheckStatus::Passed),
            outcome(Severity::Minor, CheckStatus::Passed),
        ];
        assert_eq!(readiness_score(&outcomes), 42.9);
    }

    fn minor_passes(passed: usize, total: usize) -> Vec<CheckOutcome> {
        (0..total)
            .map(|i| {
                let status = if i < passed {
                    CheckStatus::Passed
                } else {
                    CheckStatus::Failed
                };
                let mut o = outcome(Severity::Minor, status);
                o.check_id = CheckId::new(format!("minor_{}", i));
                o
            })
            .collect()
    }

    #[test]
    fn exact_ties_round_to_even_tenth() {
        // 6.25 and 31.25 are exact in binary
        assert_eq!(readiness_score(&minor_passes(1, 16)), 6.2);
        assert_eq!(readiness_score(&minor_passes(5, 16)), 31.2);
        assert_eq!(readiness_score(&minor_passes(3, 16)), 18.8);
        assert_eq!(readiness_score(&minor_passes(7, 16)), 43.8);
    }

    #[test]
    fn near_ties_follow_binary_value() {
        assert_eq!(round_tenth_half_even(0.25), 0.2);
        assert_eq!(round_tenth_half_even(0.35), 0.3);
        assert_eq!(round_tenth_half_even(0.45), 0.5);
        assert_eq!(round_tenth_half_even(99.95), 100.0);
        assert_eq!(round_tenth_half_even(100.0), 100.0);
        assert_eq!(round_tenth_half_even(0.0), 0.0);
    }

    #[test]
    fn warning_earns_half() {
        let outcomes = vec![outcome(Severity::Critical, CheckStatus::Warning)];
        assert_eq!(readiness_score(&outcomes), 50.0);
    }

    #[test]
    fn error_does_not_lower_score() {
        let base = vec![outcome(Severity::Major, CheckStatus::Passed)];
        let mut with_error = base.clone();
        with_error.push(outcome(Severity::Critical, CheckStatus::Error));
        assert_eq!(readiness_score(&base), readiness_score(&with_error));
    }

    #[test]
    fn order_does_not_matter() {
        let mut outcomes = vec![
            outcome(Severity::Critical, CheckStatus::Passed),
            outcome(Severity::Major, CheckStatus::Warning),
            outcome(Severity::Minor, CheckStatus::Failed),
        ];
        let forward = readiness_score(&outcomes);
        outcomes.reverse();
        assert_eq!(forward, readiness_score(&outcomes));
    }
}

//! Shared display helpers for runs and outcomes.
//!
//! Used by `run`, `status`, and `report` so runs render the same way
//! everywhere.

use crate::checks::{CheckOutcome, CheckStatus};
use crate::cli::output::Output;
use crate::lifecycle::{RunRecord, RunStatus, StatusCounts};
use crate::report::RunReport;

/// Return the icon for an outcome status.
pub fn status_icon(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Passed => "✓",
        CheckStatus::Failed => "✗",
        CheckStatus::Warning => "⚠",
        CheckStatus::Skipped => "○",
        CheckStatus::Error => "!",
    }
}

/// One-line count breakdown.
pub fn counts_line(counts: &StatusCounts) -> String {
    format!(
        "{} checks: {} passed, {} failed, {} warnings, {} skipped, {} errors",
        counts.total, counts.passed, counts.failed, counts.warning, counts.skipped, counts.error
    )
}

/// Score with one decimal, or a dash when the run has none yet.
pub fn score_text(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}", score),
        None => "-".to_string(),
    }
}

/// Header block for a stored run.
pub fn show_run(out: &mut Output, run: &RunRecord) {
    out.header(&format!("{} ({})", run.run_name, run.id));
    out.field("Platform", run.platform.as_str());
    let status = run.status.to_string();
    let styled = match run.status {
        RunStatus::Completed => out.theme().success.apply_to(status),
        RunStatus::Failed => out.theme().error.apply_to(status),
        RunStatus::Pending | RunStatus::Running => out.theme().warning.apply_to(status),
    }
    .to_string();
    out.field("Status", &styled);
    out.field("Readiness", &score_text(run.readiness_score));
    out.field("Counts", &counts_line(&run.counts));
    if let Some(message) = &run.error_message {
        out.error(message);
    }
}

/// A single outcome with its recommendation and affected items.
pub fn show_outcome(out: &mut Output, outcome: &CheckOutcome) {
    let head = format!(
        "  {} {} [{}] {}",
        status_icon(outcome.status),
        outcome.check_name,
        outcome.severity,
        outcome.message
    );
    let styled = out.theme().status(outcome.status).apply_to(head).to_string();
    out.line(&styled);

    if outcome.status == CheckStatus::Passed || outcome.status == CheckStatus::Skipped {
        return;
    }
    for item in &outcome.affected_items {
        let line = out.theme().dim.apply_to(format!("      - {}", item)).to_string();
        out.line(&line);
    }
    if let Some(recommendation) = &outcome.recommendation {
        for (i, text) in recommendation.lines().enumerate() {
            let prefix = if i == 0 { "    → " } else { "      " };
            out.line(&format!("{}{}", prefix, text));
        }
    }
}

/// Full report: run header, category breakdown, and every outcome.
pub fn show_report(out: &mut Output, report: &RunReport) {
    show_run(out, &report.run);
    out.field("Progress", &format!("{}%", report.progress_pct));

    if !report.critical_failures.is_empty() {
        out.error(&format!(
            "Critical failures: {}",
            report.critical_failures.join(", ")
        ));
    }

    out.line("");
    for (category, counts) in &report.by_category {
        out.field(&category.to_string(), &counts_line(counts));
    }

    out.line("");
    for outcome in &report.outcomes {
        show_outcome(out, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Category, CheckDefinition, CheckId, Severity, Tier, Verdict};
    use crate::context::Platform;
    use std::time::Duration;

    fn outcome(verdict: Verdict) -> CheckOutcome {
        let definition = CheckDefinition {
            check_id: CheckId::new("url_no_fragment"),
            check_name: "URL Has No Fragment".into(),
            category: Category::Url,
            platforms: vec![Platform::Universal],
            severity: Severity::Minor,
            tier: Tier::Compute,
        };
        CheckOutcome::new(&definition, verdict, Duration::from_millis(1))
    }

    #[test]
    fn status_icon_values() {
        assert_eq!(status_icon(CheckStatus::Passed), "✓");
        assert_eq!(status_icon(CheckStatus::Failed), "✗");
        assert_eq!(status_icon(CheckStatus::Skipped), "○");
    }

    #[test]
    fn score_text_formats_one_decimal() {
        assert_eq!(score_text(Some(87.5)), "87.5");
        assert_eq!(score_text(Some(100.0)), "100.0");
        assert_eq!(score_text(None), "-");
    }

    #[test]
    fn counts_line_format() {
        let outcomes = vec![
            outcome(Verdict::passed("ok")),
            outcome(Verdict::failed("bad")),
            outcome(Verdict::skipped("n/a")),
        ];
        insta::assert_snapshot!(
            counts_line(&StatusCounts::tally(&outcomes)),
            @"3 checks: 1 passed, 1 failed, 0 warnings, 1 skipped, 0 errors"
        );
    }

    #[test]
    fn warning_outcome_lists_affected_and_recommendation() {
        let verdict = Verdict::warning("1 URL has a fragment")
            .with_affected(["https://a.example/#x"])
            .with_recommendation("Remove the fragment\nor move it after the query");
        let mut out = Output::buffer();
        show_outcome(&mut out, &outcome(verdict));

        let text = out.contents();
        assert!(text.contains("⚠ URL Has No Fragment [minor] 1 URL has a fragment"));
        assert!(text.contains("      - https://a.example/#x"));
        assert!(text.contains("    → Remove the fragment"));
        assert!(text.contains("      or move it after the query"));
    }

    #[test]
    fn passed_outcome_is_one_line() {
        let mut out = Output::buffer();
        show_outcome(&mut out, &outcome(Verdict::passed("No fragments")));
        assert_eq!(out.contents().lines().count(), 1);
    }
}

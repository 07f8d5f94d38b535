//! Campaign naming convention check.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::checks::{Category, Check, CheckContext, CheckId, Severity, Verdict};

static VALID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-|.]+$").expect("VALID_CHARS regex must compile")
});

static DATE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(20\d{2}|Q[1-4]_?20\d{2}|\d{2}[a-z]{3}\d{4})")
        .expect("DATE_LIKE regex must compile")
});

/// Problems with a single name, as short phrases.
fn name_issues(name: &str) -> Vec<String> {
    let mut issues = Vec::new();
    if name.chars().any(char::is_whitespace) {
        issues.push("contains spaces (use underscores or hyphens)".to_string());
    }
    if !VALID_CHARS.is_match(name) {
        let bad: BTreeSet<char> = name
            .chars()
            .filter(|c| !c.is_ascii_alphanumeric() && !"_-|.".contains(*c) && !c.is_whitespace())
            .collect();
        if !bad.is_empty() {
            let bad: Vec<String> = bad.into_iter().map(String::from).collect();
            issues.push(format!("contains special characters: {}", bad.join(", ")));
        }
    }
    if !name.contains('_') && !name.contains('-') {
        issues.push("has no separators; use underscores or hyphens between segments".to_string());
    }
    let length = name.chars().count();
    if length < 5 {
        issues.push("is too short to be descriptive".to_string());
    }
    if length > 200 {
        issues.push("exceeds 200 characters".to_string());
    }
    issues
}

/// Campaign name is structured and dated.
pub struct CampaignNamingConvention;

impl Check for CampaignNamingConvention {
    fn id(&self) -> CheckId {
        CheckId::new("campaign_naming_convention")
    }
    fn name(&self) -> &str {
        "Campaign Naming Convention"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Minor
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let Some(name) = ctx
            .run
            .campaign
            .campaign_name
            .as_deref()
            .filter(|n| !n.is_empty())
        else {
            return Ok(Verdict::skipped(
                "No campaign name provided; skipping naming convention check",
            ));
        };

        let issues = name_issues(name);
        if !issues.is_empty() {
            return Ok(Verdict::failed(format!(
                "Campaign name '{}' violates naming conventions",
                name
            ))
            .with_recommendation(
                "Use a structured naming convention with no spaces, e.g. meta_conversion_lookalike_spring_Q2_2025",
            )
            .with_affected(issues.iter().map(|i| format!("Campaign name: {}", i))));
        }

        if !DATE_LIKE.is_match(name) {
            return Ok(Verdict::warning(format!(
                "Campaign name '{}' has valid format but no date/quarter identifier",
                name
            ))
            .with_recommendation(
                "Include a date or quarter in your campaign name (e.g. Q2_2025 or 20250601) to make historical reporting easier",
            ));
        }

        Ok(Verdict::passed(format!(
            "Campaign name '{}' follows naming conventions",
            name
        )))
    }
}

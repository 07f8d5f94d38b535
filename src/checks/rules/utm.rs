//! UTM parameter checks.
//!
//! Pure string inspection of each destination URL's query parameters.

use crate::checks::{Category, Check, CheckContext, CheckId, Severity, Verdict};
use crate::context::{ParsedUrl, Platform};

/// Accepted `utm_source` values per platform.
fn valid_sources(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Meta => &["facebook", "fb", "instagram", "meta"],
        Platform::Google => &["google", "cpc", "ppc"],
        Platform::Tiktok => &["tiktok", "tiktok_ads"],
        Platform::Linkedin => &["linkedin"],
        Platform::Multi | Platform::Universal => &[],
    }
}

fn missing_param(ctx: &CheckContext<'_>, key: &str, recommendation: &str) -> Verdict {
    let urls = &ctx.run.urls;
    let missing: Vec<&str> = urls
        .iter()
        .filter(|u| !u.has_param(key))
        .map(|u| u.raw_url.as_str())
        .collect();

    if missing.is_empty() {
        return Verdict::passed(format!("{} present in all {} URL(s)", key, urls.len()));
    }
    Verdict::failed(format!(
        "{} missing from {} of {} URL(s)",
        key,
        missing.len(),
        urls.len()
    ))
    .with_recommendation(recommendation)
    .with_affected(missing)
}

/// Each URL carries `utm_source`.
pub struct UtmSourcePresent;

impl Check for UtmSourcePresent {
    fn id(&self) -> CheckId {
        CheckId::new("utm_source_present")
    }
    fn name(&self) -> &str {
        "UTM Source Parameter Present"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        Ok(missing_param(
            ctx,
            "utm_source",
            "Add ?utm_source=<platform> to all destination URLs before launching",
        ))
    }
}

/// Each URL carries `utm_medium`.
pub struct UtmMediumPresent;

impl Check for UtmMediumPresent {
    fn id(&self) -> CheckId {
        CheckId::new("utm_medium_present")
    }
    fn name(&self) -> &str {
        "UTM Medium Parameter Present"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        Ok(missing_param(
            ctx,
            "utm_medium",
            "Add utm_medium=cpc (or paid_social / display) to all destination URLs",
        ))
    }
}

/// Each URL carries `utm_campaign`.
pub struct UtmCampaignPresent;

impl Check for UtmCampaignPresent {
    fn id(&self) -> CheckId {
        CheckId::new("utm_campaign_present")
    }
    fn name(&self) -> &str {
        "UTM Campaign Parameter Present"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        Ok(missing_param(
            ctx,
            "utm_campaign",
            "Add utm_campaign=<campaign_name> to all destination URLs",
        ))
    }
}

fn utm_values(url: &ParsedUrl) -> impl Iterator<Item = (&String, &String)> {
    url.params.iter().filter(|(k, _)| k.starts_with("utm_"))
}

/// UTM values contain no spaces.
pub struct UtmNoSpaces;

impl Check for UtmNoSpaces {
    fn id(&self) -> CheckId {
        CheckId::new("utm_no_spaces")
    }
    fn name(&self) -> &str {
        "UTM Parameters Free of Spaces"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let bad: Vec<String> = ctx
            .run
            .urls
            .iter()
            .flat_map(|u| {
                utm_values(u)
                    .filter(|(_, v)| v.contains(' '))
                    .map(move |(k, v)| format!("{} ({}='{}')", u.raw_url, k, v))
            })
            .collect();

        if bad.is_empty() {
            return Ok(Verdict::passed("No spaces found in UTM parameter values"));
        }
        Ok(Verdict::failed(format!(
            "Spaces found in UTM values on {} URL(s); analytics reporting will break",
            bad.len()
        ))
        .with_recommendation(
            "Replace spaces with underscores or hyphens in UTM values (e.g., my_campaign not my campaign)",
        )
        .with_affected(bad))
    }
}

/// UTM values are lowercase.
pub struct UtmCaseConsistency;

impl Check for UtmCaseConsistency {
    fn id(&self) -> CheckId {
        CheckId::new("utm_case_consistency")
    }
    fn name(&self) -> &str {
        "UTM Parameter Case Consistency"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Minor
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let violations: Vec<String> = ctx
            .run
            .urls
            .iter()
            .flat_map(|u| {
                utm_values(u)
                    .filter(|(_, v)| **v != v.to_lowercase())
                    .map(move |(k, v)| format!("{} ({}='{}')", u.raw_url, k, v))
            })
            .collect();

        if violations.is_empty() {
            return Ok(Verdict::passed("All UTM values are lowercase"));
        }
        Ok(Verdict::warning(format!(
            "Mixed-case UTM values found on {} URL(s); may cause duplicate entries in GA4",
            violations.len()
        ))
        .with_recommendation(
            "Standardize all UTM values to lowercase to prevent duplicate campaign rows in GA4",
        )
        .with_affected(violations))
    }
}

/// `utm_source` matches the run's platform.
pub struct UtmSourceMatchesPlatform;

impl Check for UtmSourceMatchesPlatform {
    fn id(&self) -> CheckId {
        CheckId::new("utm_source_matches_platform")
    }
    fn name(&self) -> &str {
        "UTM Source Matches Selected Platform"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn platforms(&self) -> &[Platform] {
        &[
            Platform::Meta,
            Platform::Google,
            Platform::Tiktok,
            Platform::Linkedin,
        ]
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let platform = ctx.run.platform;
        let expected = valid_sources(platform);
        if expected.is_empty() {
            return Ok(Verdict::skipped(
                "Platform-specific UTM source check not applicable",
            ));
        }

        let mismatched: Vec<String> = ctx
            .run
            .urls
            .iter()
            .filter_map(|u| {
                let source = u.param("utm_source")?.to_lowercase();
                (!source.is_empty() && !expected.contains(&source.as_str())).then(|| {
                    format!(
                        "{} (found: utm_source='{}', expected one of: {})",
                        u.raw_url,
                        source,
                        expected.join(", ")
                    )
                })
            })
            .collect();

        if mismatched.is_empty() {
            return Ok(Verdict::passed(format!(
                "utm_source values match expected values for {}",
                platform
            )));
        }
        Ok(Verdict::warning(format!(
            "utm_source value may not match platform on {} URL(s)",
            mismatched.len()
        ))
        .with_recommendation(format!(
            "For {} campaigns, utm_source should be one of: {}",
            platform,
            expected.join(", ")
        ))
        .with_affected(mismatched))
    }
}

/// No query key appears twice.
pub struct UtmNoDuplicateParams;

impl Check for UtmNoDuplicateParams {
    fn id(&self) -> CheckId {
        CheckId::new("utm_no_duplicate_params")
    }
    fn name(&self) -> &str {
        "No Duplicate URL Parameters"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let bad: Vec<String> = ctx
            .run
            .urls
            .iter()
            .filter_map(|u| {
                let dupes = u.duplicate_params();
                (!dupes.is_empty())
                    .then(|| format!("{} (duplicate params: {})", u.raw_url, dupes.join(", ")))
            })
            .collect();

        if bad.is_empty() {
            return Ok(Verdict::passed("No duplicate URL parameters found"));
        }
        Ok(Verdict::failed(format!(
            "Duplicate query parameters found in {} URL(s); GA4 will report unpredictably",
            bad.len()
        ))
        .with_recommendation("Remove duplicate parameters from destination URLs")
        .with_affected(bad))
    }
}

/// Google URLs carry either auto-tagging (`gclid`) or a `utm_id`.
///
/// A `gclid` exempts the URL outright, even when its `utm_source` names
/// another platform.
pub struct GoogleClickIdOrUtmId;

impl Check for GoogleClickIdOrUtmId {
    fn id(&self) -> CheckId {
        CheckId::new("google_click_id_or_utm_id")
    }
    fn name(&self) -> &str {
        "Google Click ID or UTM ID Present"
    }
    fn category(&self) -> Category {
        Category::Tracking
    }
    fn platforms(&self) -> &[Platform] {
        &[Platform::Google]
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let missing: Vec<&str> = ctx
            .run
            .urls
            .iter()
            .filter(|u| !u.has_param("gclid") && !u.has_param("utm_id"))
            .map(|u| u.raw_url.as_str())
            .collect();

        if missing.is_empty() {
            return Ok(Verdict::passed(
                "Every URL carries gclid auto-tagging or a utm_id",
            ));
        }
        Ok(Verdict::failed(format!(
            "{} URL(s) have neither gclid nor utm_id; GA4 cannot join cost data",
            missing.len()
        ))
        .with_recommendation("Enable Google Ads auto-tagging or add utm_id=<campaign id> to each URL")
        .with_affected(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckStatus;
    use crate::context::RunContext;
    use crate::fetch::FetchCache;
    use crate::lifecycle::RunId;

    fn run(check: &dyn Check, platform: Platform, urls: &[&str]) -> Verdict {
        let ctx = RunContext::new(
            RunId::new(),
            platform,
            urls.iter().map(|u| ParsedUrl::from_raw(u)).collect(),
        );
        let fetch = FetchCache::offline();
        check.execute(&CheckContext::new(&ctx, &fetch)).unwrap()
    }

    #[test]
    fn utm_source_missing_lists_only_offenders() {
        let verdict = run(
            &UtmSourcePresent,
            Platform::Meta,
            &["https://a.example.com/", "https://b.example.com/?utm_source=fb"],
        );
        assert_eq!(verdict.status, CheckStatus::Failed);
        assert_eq!(verdict.affected_items, vec!["https://a.example.com/"]);
        assert!(verdict.message.contains("1 of 2"));
    }

    #[test]
    fn utm_medium_present_passes() {
        let verdict = run(&UtmMediumPresent, Platform::Meta, &["https://a.io/?utm_medium=cpc"]);
        assert_eq!(verdict.status, CheckStatus::Passed);
    }

    #[test]
    fn spaces_detected_in_decoded_values() {
        let verdict = run(
            &UtmNoSpaces,
            Platform::Meta,
            &["https://a.io/?utm_campaign=spring%20sale"],
        );
        assert_eq!(verdict.status, CheckStatus::Failed);
        assert!(verdict.affected_items[0].contains("utm_campaign='spring sale'"));
    }

    #[test]
    fn mixed_case_is_warning() {
        let verdict = run(
            &UtmCaseConsistency,
            Platform::Meta,
            &["https://a.io/?utm_source=Facebook"],
        );
        assert_eq!(verdict.status, CheckStatus::Warning);
    }

    #[test]
    fn source_mismatch_warns() {
        let verdict = run(
            &UtmSourceMatchesPlatform,
            Platform::Google,
            &["https://a.io/?utm_source=facebook", "https://a.io/?utm_source=google"],
        );
        assert_eq!(verdict.status, CheckStatus::Warning);
        assert_eq!(verdict.affected_items.len(), 1);
    }

    #[test]
    fn source_match_skipped_for_multi() {
        let verdict = run(&UtmSourceMatchesPlatform, Platform::Multi, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }

    #[test]
    fn duplicate_params_fail() {
        let verdict = run(
            &UtmNoDuplicateParams,
            Platform::Meta,
            &["https://a.io/?utm_source=a&utm_source=b"],
        );
        assert_eq!(verdict.status, CheckStatus::Failed);
    }

    #[test]
    fn gclid_exempts_even_with_mismatched_source() {
        let verdict = run(
            &GoogleClickIdOrUtmId,
            Platform::Google,
            &["https://a.io/?gclid=abc&utm_source=facebook"],
        );
        assert_eq!(verdict.status, CheckStatus::Passed);
    }

    #[test]
    fn neither_gclid_nor_utm_id_fails() {
        let verdict = run(
            &GoogleClickIdOrUtmId,
            Platform::Google,
            &["https://a.io/?utm_source=google", "https://b.io/?utm_id=42"],
        );
        assert_eq!(verdict.status, CheckStatus::Failed);
        assert_eq!(verdict.affected_items, vec!["https://a.io/?utm_source=google"]);
    }
}

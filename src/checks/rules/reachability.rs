//! Landing page reachability and redirect checks.
//!
//! These go through the run's fetch cache, which answers per normalized
//! host. Each rule therefore inspects one representative URL per host.

use std::sync::Arc;
use std::time::Duration;

use super::unique_hosts;
use crate::checks::{Category, Check, CheckContext, CheckId, Severity, Tier, Verdict};
use crate::fetch::{FetchMode, FetchOutcome};

/// Responses slower than this earn a warning.
const SLOW_THRESHOLD: Duration = Duration::from_secs(3);

/// Redirect hops tolerated before flagging a chain.
const MAX_REDIRECT_HOPS: usize = 3;

/// HEAD the URL, falling back to GET when HEAD is rejected.
fn head_fetch(ctx: &CheckContext<'_>, url: &str) -> Arc<FetchOutcome> {
    let head = ctx.fetch.fetch(url, FetchMode::Head);
    if head.is_ok() {
        return head;
    }
    let get = ctx.fetch.fetch(url, FetchMode::Get);
    if get.response().is_some() {
        get
    } else {
        head
    }
}

fn describe_failure(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Response(page) => format!("{} (status: {})", page.requested_url, page.status),
        FetchOutcome::Unreachable { url, reason } => format!("{} ({})", url, reason),
    }
}

/// Every landing page answers with 2xx/3xx.
pub struct UrlReachable;

impl Check for UrlReachable {
    fn id(&self) -> CheckId {
        CheckId::new("url_reachable")
    }
    fn name(&self) -> &str {
        "Destination URLs Are Reachable"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn tier(&self) -> Tier {
        Tier::Network
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let targets = unique_hosts(&ctx.run.urls);
        if targets.is_empty() {
            return Ok(Verdict::skipped("No parseable URLs to fetch"));
        }

        let results: Vec<Arc<FetchOutcome>> = targets.iter().map(|u| head_fetch(ctx, &u.raw_url)).collect();

        let unreachable: Vec<String> = results
            .iter()
            .filter(|r| !r.is_ok())
            .map(|r| describe_failure(r))
            .collect();
        if !unreachable.is_empty() {
            return Ok(Verdict::failed(format!(
                "{} of {} URL(s) are unreachable or returned an error",
                unreachable.len(),
                results.len()
            ))
            .with_recommendation("Fix broken destination URLs before launching the campaign")
            .with_affected(unreachable));
        }

        let pages: Vec<_> = results.iter().filter_map(|r| r.response()).collect();
        let slow: Vec<String> = pages
            .iter()
            .filter(|p| p.elapsed > SLOW_THRESHOLD)
            .map(|p| format!("{} ({}ms)", p.requested_url, p.elapsed.as_millis()))
            .collect();
        if !slow.is_empty() {
            return Ok(Verdict::warning(format!(
                "All URLs reachable, but {} URL(s) responded slowly (>3s); may impact Quality Score",
                slow.len()
            ))
            .with_recommendation(
                "Improve landing page load time for better ad Quality Score and conversion rates",
            )
            .with_affected(slow));
        }

        let total_ms: u128 = pages.iter().map(|p| p.elapsed.as_millis()).sum();
        let avg_ms = u64::try_from(total_ms / pages.len().max(1) as u128).unwrap_or(u64::MAX);
        Ok(
            Verdict::passed(format!("All {} URL(s) are reachable", pages.len()))
                .with_metadata("avg_ms", avg_ms),
        )
    }
}

/// Redirect chains stay short.
pub struct UrlRedirectDepth;

impl Check for UrlRedirectDepth {
    fn id(&self) -> CheckId {
        CheckId::new("url_redirect_depth")
    }
    fn name(&self) -> &str {
        "URL Redirect Chain Depth"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn tier(&self) -> Tier {
        Tier::Network
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let results: Vec<Arc<FetchOutcome>> = unique_hosts(&ctx.run.urls)
            .iter()
            .map(|u| ctx.fetch.fetch(&u.raw_url, FetchMode::Head))
            .collect();
        let pages: Vec<_> = results.iter().filter_map(|r| r.response()).collect();
        if pages.is_empty() {
            return Ok(Verdict::skipped(
                "Could not reach any landing page to measure redirects",
            ));
        }

        let deep: Vec<String> = pages
            .iter()
            .filter(|p| p.redirect_count() > MAX_REDIRECT_HOPS)
            .map(|p| {
                format!(
                    "{} ({} redirects -> {})",
                    p.requested_url,
                    p.redirect_count(),
                    p.final_url
                )
            })
            .collect();

        if deep.is_empty() {
            return Ok(Verdict::passed(format!(
                "All URL(s) have redirect chains of {} hops or fewer",
                MAX_REDIRECT_HOPS
            )));
        }
        Ok(Verdict::warning(format!(
            "{} URL(s) have redirect chains longer than {} hops; slows page load",
            deep.len(),
            MAX_REDIRECT_HOPS
        ))
        .with_recommendation(
            "Shorten redirect chains to reduce latency. Each redirect adds 100-300ms load time.",
        )
        .with_affected(deep))
    }
}

/// Redirects keep the UTM query intact.
pub struct UtmPreservedThroughRedirect;

impl Check for UtmPreservedThroughRedirect {
    fn id(&self) -> CheckId {
        CheckId::new("utm_preserved_through_redirect")
    }
    fn name(&self) -> &str {
        "UTM Parameters Preserved Through Redirects"
    }
    fn category(&self) -> Category {
        Category::Utm
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn tier(&self) -> Tier {
        Tier::Network
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        if !ctx.run.urls.iter().any(|u| u.has_param("utm_source")) {
            return Ok(Verdict::skipped(
                "No UTM parameters to check for redirect preservation",
            ));
        }
        let tagged: Vec<_> = unique_hosts(&ctx.run.urls)
            .into_iter()
            .filter(|u| u.has_param("utm_source"))
            .collect();
        if tagged.is_empty() {
            return Ok(Verdict::skipped(
                "The first URL for each host carries no UTM parameters",
            ));
        }

        let results: Vec<Arc<FetchOutcome>> = tagged
            .iter()
            .map(|u| ctx.fetch.fetch(&u.raw_url, FetchMode::Head))
            .collect();
        let pages: Vec<_> = tagged
            .iter()
            .zip(&results)
            .filter_map(|(u, r)| r.response().filter(|p| p.answers(&u.raw_url)))
            .collect();
        if !pages.iter().any(|p| p.is_ok()) {
            return Ok(Verdict::skipped(
                "Could not reach any tagged landing page to follow redirects",
            ));
        }

        let stripped: Vec<String> = pages
            .iter()
            .filter(|p| p.is_ok() && p.redirect_count() > 0 && !p.final_url.contains("utm_"))
            .map(|p| format!("{} -> {} (UTM stripped)", p.requested_url, p.final_url))
            .collect();

        if stripped.is_empty() {
            return Ok(Verdict::passed(
                "UTM parameters appear to be preserved through redirects",
            ));
        }
        Ok(Verdict::failed(format!(
            "UTM parameters stripped by redirect on {} URL(s); campaign attribution will be lost",
            stripped.len()
        ))
        .with_recommendation(
            "Update redirect rules to pass through all query parameters, or use canonical final URLs with UTM params appended directly",
        )
        .with_affected(stripped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckStatus;
    use crate::context::{ParsedUrl, Platform, RunContext};
    use crate::fetch::canned::CannedTransport;
    use crate::fetch::{FetchCache, FetchPolicy};
    use crate::lifecycle::RunId;

    fn run(check: &dyn Check, transport: CannedTransport, urls: &[&str]) -> Verdict {
        let ctx = RunContext::new(
            RunId::new(),
            Platform::Meta,
            urls.iter().map(|u| ParsedUrl::from_raw(u)).collect(),
        );
        let fetch = FetchCache::new(Arc::new(transport), FetchPolicy::default());
        check.execute(&CheckContext::new(&ctx, &fetch)).unwrap()
    }

    #[test]
    fn reachable_pages_pass() {
        let transport = CannedTransport::default().with("https://a.io/", 200, &[], "");
        let verdict = run(&UrlReachable, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Passed);
    }

    #[test]
    fn unreachable_host_fails_with_reason() {
        let transport = CannedTransport::default().with("https://a.io/", 200, &[], "");
        let verdict = run(&UrlReachable, transport, &["https://a.io/", "https://down.io/"]);
        assert_eq!(verdict.status, CheckStatus::Failed);
        assert_eq!(verdict.affected_items.len(), 1);
        assert!(verdict.affected_items[0].contains("connection refused"));
    }

    #[test]
    fn head_rejection_falls_back_to_get() {
        // Canned pages answer both methods alike, so the GET retry sees 405 too.
        let transport = CannedTransport::default().with("https://a.io/", 405, &[], "");
        let verdict = run(&UrlReachable, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Failed);
        assert!(verdict.affected_items[0].contains("status: 405"));
    }

    #[test]
    fn long_redirect_chain_warns() {
        let transport = CannedTransport::default()
            .with("https://a.io/", 302, &[("location", "/1")], "")
            .with("https://a.io/1", 302, &[("location", "/2")], "")
            .with("https://a.io/2", 302, &[("location", "/3")], "")
            .with("https://a.io/3", 302, &[("location", "/4")], "")
            .with("https://a.io/4", 200, &[], "");
        let verdict = run(&UrlRedirectDepth, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Warning);
        assert!(verdict.affected_items[0].contains("4 redirects"));
    }

    #[test]
    fn redirect_depth_skips_when_nothing_reachable() {
        let verdict = run(&UrlRedirectDepth, CannedTransport::default(), &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }

    #[test]
    fn stripped_utm_fails() {
        let transport = CannedTransport::default()
            .with("https://a.io/?utm_source=fb", 301, &[("location", "https://a.io/home")], "")
            .with("https://a.io/home", 200, &[], "");
        let verdict = run(&UtmPreservedThroughRedirect, transport, &["https://a.io/?utm_source=fb"]);
        assert_eq!(verdict.status, CheckStatus::Failed);
    }

    #[test]
    fn preserved_utm_passes() {
        let transport = CannedTransport::default()
            .with("https://a.io/?utm_source=fb", 301, &[("location", "/home?utm_source=fb")], "")
            .with("https://a.io/home?utm_source=fb", 200, &[], "");
        let verdict = run(&UtmPreservedThroughRedirect, transport, &["https://a.io/?utm_source=fb"]);
        assert_eq!(verdict.status, CheckStatus::Passed);
    }

    #[test]
    fn untagged_urls_skip_preservation_check() {
        let verdict = run(
            &UtmPreservedThroughRedirect,
            CannedTransport::default(),
            &["https://a.io/"],
        );
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }

    #[test]
    fn preservation_verdict_does_not_depend_on_rule_order() {
        let transport = || {
            CannedTransport::default()
                .with("https://a.io/home", 301, &[("location", "/welcome")], "")
                .with("https://a.io/welcome", 200, &[], "")
                .with("https://a.io/?utm_source=fb", 200, &[], "")
        };
        let ctx = RunContext::new(
            RunId::new(),
            Platform::Meta,
            vec![
                ParsedUrl::from_raw("https://a.io/home"),
                ParsedUrl::from_raw("https://a.io/?utm_source=fb"),
            ],
        );

        let depth_first = FetchCache::new(Arc::new(transport()), FetchPolicy::default());
        let check_ctx = CheckContext::new(&ctx, &depth_first);
        UrlRedirectDepth.execute(&check_ctx).unwrap();
        let after_depth = UtmPreservedThroughRedirect.execute(&check_ctx).unwrap();

        let alone = FetchCache::new(Arc::new(transport()), FetchPolicy::default());
        let by_itself = UtmPreservedThroughRedirect
            .execute(&CheckContext::new(&ctx, &alone))
            .unwrap();

        assert_eq!(after_depth.status, CheckStatus::Skipped);
        assert_eq!(by_itself.status, after_depth.status);
        assert!(after_depth.affected_items.is_empty());
    }

    #[test]
    fn tagged_representative_is_judged_after_other_rules() {
        let transport = CannedTransport::default()
            .with("https://a.io/?utm_source=fb", 301, &[("location", "/home")], "")
            .with("https://a.io/home", 200, &[], "");
        let ctx = RunContext::new(
            RunId::new(),
            Platform::Meta,
            vec![
                ParsedUrl::from_raw("https://a.io/?utm_source=fb"),
                ParsedUrl::from_raw("https://a.io/other"),
            ],
        );
        let fetch = FetchCache::new(Arc::new(transport), FetchPolicy::default());
        let check_ctx = CheckContext::new(&ctx, &fetch);

        UrlReachable.execute(&check_ctx).unwrap();
        let verdict = UtmPreservedThroughRedirect.execute(&check_ctx).unwrap();
        assert_eq!(verdict.status, CheckStatus::Failed);
        assert_eq!(
            verdict.affected_items,
            vec!["https://a.io/?utm_source=fb -> https://a.io/home (UTM stripped)"]
        );
    }

    #[test]
    fn unreachable_tagged_pages_never_pass() {
        let verdict = run(
            &UtmPreservedThroughRedirect,
            CannedTransport::default(),
            &["https://a.io/?utm_source=fb"],
        );
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }
}

//! Destination URL structure checks.

use std::collections::BTreeSet;

use crate::checks::{Category, Check, CheckContext, CheckId, Severity, Verdict};
use crate::context::normalize_host;

/// Longest URL accepted before ad platforms start truncating.
const MAX_URL_LENGTH: usize = 2000;

/// Every URL uses `https`.
pub struct UrlUsesHttps;

impl Check for UrlUsesHttps {
    fn id(&self) -> CheckId {
        CheckId::new("url_uses_https")
    }
    fn name(&self) -> &str {
        "Destination URL Uses HTTPS"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let insecure: Vec<&str> = ctx
            .run
            .urls
            .iter()
            .filter(|u| u.parse_error.is_none() && u.scheme().as_deref() != Some("https"))
            .map(|u| u.raw_url.as_str())
            .collect();

        if insecure.is_empty() {
            return Ok(Verdict::passed("All destination URLs use HTTPS"));
        }
        Ok(Verdict::failed(format!(
            "{} URL(s) do not use HTTPS; ad platforms may reject them",
            insecure.len()
        ))
        .with_recommendation("Serve landing pages over HTTPS and update the destination URLs")
        .with_affected(insecure))
    }
}

/// Every URL parses with a scheme and host.
pub struct UrlParseable;

impl Check for UrlParseable {
    fn id(&self) -> CheckId {
        CheckId::new("url_parseable")
    }
    fn name(&self) -> &str {
        "Destination URL Is Well-Formed"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let broken: Vec<String> = ctx
            .run
            .urls
            .iter()
            .filter_map(|u| match &u.parse_error {
                Some(reason) => Some(format!("{} ({})", u.raw_url, reason)),
                None if u.host.is_empty() => Some(format!("{} (no host)", u.raw_url)),
                None => None,
            })
            .collect();

        if broken.is_empty() {
            return Ok(Verdict::passed("All destination URLs are well-formed"));
        }
        Ok(Verdict::failed(format!("{} URL(s) could not be parsed", broken.len()))
            .with_recommendation("Use absolute URLs of the form https://example.com/path")
            .with_affected(broken))
    }
}

/// No whitespace anywhere in the URL text.
pub struct UrlNoWhitespace;

impl Check for UrlNoWhitespace {
    fn id(&self) -> CheckId {
        CheckId::new("url_no_whitespace")
    }
    fn name(&self) -> &str {
        "Destination URL Free of Whitespace"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let bad: Vec<&str> = ctx
            .run
            .urls
            .iter()
            .filter(|u| u.raw_url.chars().any(char::is_whitespace))
            .map(|u| u.raw_url.as_str())
            .collect();

        if bad.is_empty() {
            return Ok(Verdict::passed("No whitespace found in destination URLs"));
        }
        Ok(Verdict::failed(format!(
            "{} URL(s) contain unencoded whitespace",
            bad.len()
        ))
        .with_recommendation("Percent-encode spaces as %20 or remove them")
        .with_affected(bad))
    }
}

/// Fragments are flagged since some platforms drop everything after `#`.
pub struct UrlNoFragment;

impl Check for UrlNoFragment {
    fn id(&self) -> CheckId {
        CheckId::new("url_no_fragment")
    }
    fn name(&self) -> &str {
        "Destination URL Has No Fragment"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let with_fragment: Vec<String> = ctx
            .run
            .urls
            .iter()
            .filter_map(|u| u.fragment().map(|f| format!("{} (#{})", u.raw_url, f)))
            .collect();

        if with_fragment.is_empty() {
            return Ok(Verdict::passed("No URL fragments found"));
        }
        Ok(Verdict::warning(format!(
            "{} URL(s) contain a #fragment; parameters after it are not sent to the server",
            with_fragment.len()
        ))
        .with_recommendation("Move tracking parameters before the # or drop the fragment")
        .with_affected(with_fragment))
    }
}

/// URLs stay under the length ad platforms accept.
pub struct UrlLength;

impl Check for UrlLength {
    fn id(&self) -> CheckId {
        CheckId::new("url_length")
    }
    fn name(&self) -> &str {
        "Destination URL Length"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Major
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let long: Vec<String> = ctx
            .run
            .urls
            .iter()
            .filter(|u| u.raw_url.chars().count() > MAX_URL_LENGTH)
            .map(|u| {
                let prefix: String = u.raw_url.chars().take(80).collect();
                format!("{}... ({} chars)", prefix, u.raw_url.chars().count())
            })
            .collect();

        if long.is_empty() {
            return Ok(Verdict::passed(format!(
                "All URLs are under {} characters",
                MAX_URL_LENGTH
            )));
        }
        Ok(Verdict::failed(format!(
            "{} URL(s) exceed {} characters",
            long.len(),
            MAX_URL_LENGTH
        ))
        .with_recommendation("Shorten query strings or use a redirect-free short path")
        .with_affected(long)
        .with_metadata("max_length", MAX_URL_LENGTH))
    }
}

/// All URLs in a run point at the same site.
pub struct UrlUniformDomain;

impl Check for UrlUniformDomain {
    fn id(&self) -> CheckId {
        CheckId::new("url_uniform_domain")
    }
    fn name(&self) -> &str {
        "Destination URLs Share a Domain"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Minor
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let hosts: BTreeSet<String> = ctx
            .run
            .urls
            .iter()
            .filter(|u| !u.host.is_empty())
            .map(|u| normalize_host(&u.host))
            .collect();

        if ctx.run.urls.len() < 2 || hosts.is_empty() {
            return Ok(Verdict::skipped("Fewer than two URLs to compare"));
        }
        if hosts.len() == 1 {
            return Ok(Verdict::passed("All URLs point to the same domain"));
        }
        Ok(Verdict::failed(format!(
            "URLs span {} different domains",
            hosts.len()
        ))
        .with_recommendation("Confirm every ad in this run should send traffic to a different site")
        .with_affected(hosts))
    }
}

//! Landing page header and markup checks.

use regex::Regex;
use std::sync::LazyLock;

use super::unique_hosts;
use crate::checks::{Category, Check, CheckContext, CheckId, Severity, Tier, Verdict};
use crate::fetch::{FetchMode, PageResponse};

const REQUIRED_HEADERS: &[(&str, &str)] = &[
    ("strict-transport-security", "HSTS (forces HTTPS for return visitors)"),
    ("x-content-type-options", "prevents MIME-type sniffing attacks"),
    ("x-frame-options", "prevents clickjacking via iframes"),
];

/// Open Graph properties a landing page should declare.
const OG_PROPERTIES: &[&str] = &["og:title", "og:image", "og:description"];

/// One matcher per property, accepting either attribute order.
static OG_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    OG_PROPERTIES
        .iter()
        .map(|prop| {
            let pattern = format!(
                r#"(?i)<meta[^>]+property=["']{p}["'][^>]+content=["'][^"']+|<meta[^>]+content=["'][^"']+["'][^>]+property=["']{p}["']"#,
                p = regex::escape(prop)
            );
            (*prop, Regex::new(&pattern).expect("OG pattern must compile"))
        })
        .collect()
});

/// Landing pages send baseline security headers.
pub struct SecurityHeaders;

impl SecurityHeaders {
    /// HEAD first, then GET. The cache is shared across schemes, so only a
    /// page fetched for `url` itself counts.
    fn headers_for(ctx: &CheckContext<'_>, url: &str) -> Option<PageResponse> {
        [FetchMode::Head, FetchMode::Get].into_iter().find_map(|mode| {
            ctx.fetch
                .fetch(url, mode)
                .response()
                .filter(|page| page.answers(url))
                .cloned()
        })
    }
}

impl Check for SecurityHeaders {
    fn id(&self) -> CheckId {
        CheckId::new("security_headers")
    }
    fn name(&self) -> &str {
        "HTTP Security Headers"
    }
    fn category(&self) -> Category {
        Category::Url
    }
    fn severity(&self) -> Severity {
        Severity::Minor
    }
    fn tier(&self) -> Tier {
        Tier::Network
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let https: Vec<_> = unique_hosts(&ctx.run.urls)
            .into_iter()
            .filter(|u| u.scheme().as_deref() == Some("https"))
            .collect();
        if https.is_empty() {
            return Ok(Verdict::skipped("No HTTPS URLs to check for security headers"));
        }

        let pages: Vec<PageResponse> = https
            .iter()
            .filter_map(|u| Self::headers_for(ctx, &u.raw_url))
            .collect();
        if pages.is_empty() {
            return Ok(Verdict::error("Could not fetch headers from any landing page"));
        }

        let mut hsts_missing = false;
        let missing_per_url: Vec<String> = pages
            .iter()
            .filter_map(|page| {
                let missing: Vec<&str> = REQUIRED_HEADERS
                    .iter()
                    .filter(|(header, _)| page.header(header).is_none())
                    .map(|(_, label)| *label)
                    .collect();
                if missing.is_empty() {
                    return None;
                }
                hsts_missing |= page.header("strict-transport-security").is_none();
                Some(format!("{}: missing {}", page.requested_url, missing.join(", ")))
            })
            .collect();

        if missing_per_url.is_empty() {
            return Ok(Verdict::passed(format!(
                "All required security headers present on {} checked HTTPS page(s)",
                pages.len()
            ))
            .with_metadata(
                "checked_urls",
                pages
                    .iter()
                    .map(|p| p.requested_url.clone())
                    .collect::<Vec<_>>(),
            ));
        }

        let mut message = format!("{} URL(s) missing security headers.", missing_per_url.len());
        if hsts_missing {
            message.push_str(" Missing HSTS means browsers may not enforce HTTPS on return visits.");
        }
        Ok(Verdict::warning(message)
            .with_recommendation(
                "Add Strict-Transport-Security, X-Content-Type-Options: nosniff and X-Frame-Options: SAMEORIGIN at the web server or CDN",
            )
            .with_affected(missing_per_url))
    }
}

/// Landing pages declare social preview tags.
pub struct OgTagsPresent;

impl Check for OgTagsPresent {
    fn id(&self) -> CheckId {
        CheckId::new("og_tags_present")
    }
    fn name(&self) -> &str {
        "Open Graph / Social Preview Tags Present"
    }
    fn category(&self) -> Category {
        Category::Tracking
    }
    fn severity(&self) -> Severity {
        Severity::Minor
    }
    fn tier(&self) -> Tier {
        Tier::Network
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let outcomes: Vec<_> = unique_hosts(&ctx.run.urls)
            .iter()
            .map(|u| ctx.fetch.fetch(&u.raw_url, FetchMode::Get))
            .collect();
        let pages: Vec<&PageResponse> = outcomes
            .iter()
            .filter_map(|o| o.response())
            .filter(|p| p.status < 400 && !p.body.is_empty())
            .collect();
        if pages.is_empty() {
            return Ok(Verdict::skipped(
                "Could not fetch landing pages to check OG tags",
            ));
        }

        let missing: Vec<String> = pages
            .iter()
            .filter_map(|page| {
                let absent: Vec<&str> = OG_PATTERNS
                    .iter()
                    .filter(|(_, re)| !re.is_match(&page.body))
                    .map(|(prop, _)| *prop)
                    .collect();
                (!absent.is_empty())
                    .then(|| format!("{}: missing {}", page.requested_url, absent.join(", ")))
            })
            .collect();

        if missing.is_empty() {
            return Ok(Verdict::passed(format!(
                "og:title, og:image, og:description present on all {} checked landing page(s)",
                pages.len()
            )));
        }
        Ok(Verdict::warning(format!(
            "Missing OG tags on {} landing page(s); social previews may appear broken when shared",
            missing.len()
        ))
        .with_recommendation(
            "Add og:title, og:image (min 1200x630px), and og:description to all landing pages",
        )
        .with_affected(missing))
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
    use std::sync::Arc;

    fn run(check: &dyn Check, transport: CannedTransport, urls: &[&str]) -> Verdict {
        let ctx = RunContext::new(
            RunId::new(),
            Platform::Meta,
            urls.iter().map(|u| ParsedUrl::from_raw(u)).collect(),
        );
        let fetch = FetchCache::new(Arc::new(transport), FetchPolicy::default());
        check.execute(&CheckContext::new(&ctx, &fetch)).unwrap()
    }

    const FULL_HEAD: &str = r#"<html><head>
        <meta property="og:title" content="Spring Sale">
        <meta content="https://a.io/og.png" property="og:image">
        <meta property='og:description' content='Save big'>
        </head></html>"#;

    #[test]
    fn all_headers_present_passes() {
        let transport = CannedTransport::default().with(
            "https://a.io/",
            200,
            &[
                ("Strict-Transport-Security", "max-age=31536000"),
                ("X-Content-Type-Options", "nosniff"),
                ("X-Frame-Options", "SAMEORIGIN"),
            ],
            "",
        );
        let verdict = run(&SecurityHeaders, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Passed);
    }

    #[test]
    fn missing_hsts_warns() {
        let transport = CannedTransport::default().with(
            "https://a.io/",
            200,
            &[("x-content-type-options", "nosniff")],
            "",
        );
        let verdict = run(&SecurityHeaders, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Warning);
        assert!(verdict.message.contains("HSTS"));
        assert!(verdict.affected_items[0].contains("clickjacking"));
    }

    #[test]
    fn http_only_urls_skip_header_check() {
        let verdict = run(&SecurityHeaders, CannedTransport::default(), &["http://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }

    #[test]
    fn http_representative_skips_header_check() {
        let transport = CannedTransport::default()
            .with("http://a.io/", 200, &[], "")
            .with("https://a.io/secure", 200, &[], "");
        let verdict = run(
            &SecurityHeaders,
            transport,
            &["http://a.io/", "https://a.io/secure"],
        );
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }

    #[test]
    fn plain_http_fetch_of_same_host_is_not_judged() {
        let transport = CannedTransport::default()
            .with("http://a.io/", 200, &[], "")
            .with("https://a.io/secure", 200, &[("x-frame-options", "DENY")], "");
        let ctx = RunContext::new(
            RunId::new(),
            Platform::Meta,
            vec![ParsedUrl::from_raw("https://a.io/secure")],
        );
        let fetch = FetchCache::new(Arc::new(transport), FetchPolicy::default());
        fetch.fetch("http://a.io/", FetchMode::Head);

        let verdict = SecurityHeaders
            .execute(&CheckContext::new(&ctx, &fetch))
            .unwrap();
        assert_eq!(verdict.status, CheckStatus::Warning);
        assert_eq!(verdict.affected_items.len(), 1);
        assert!(verdict.affected_items[0].starts_with("https://a.io/secure: missing HSTS"));
    }

    #[test]
    fn unreachable_https_pages_are_error() {
        let verdict = run(&SecurityHeaders, CannedTransport::default(), &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Error);
    }

    #[test]
    fn og_tags_in_either_attribute_order_pass() {
        let transport = CannedTransport::default().with("https://a.io/", 200, &[], FULL_HEAD);
        let verdict = run(&OgTagsPresent, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Passed);
    }

    #[test]
    fn missing_og_image_warns() {
        let transport = CannedTransport::default().with(
            "https://a.io/",
            200,
            &[],
            r#"<meta property="og:title" content="x"><meta property="og:description" content="y">"#,
        );
        let verdict = run(&OgTagsPresent, transport, &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Warning);
        assert_eq!(verdict.affected_items, vec!["https://a.io/: missing og:image"]);
    }

    #[test]
    fn unfetchable_pages_skip_og_check() {
        let verdict = run(&OgTagsPresent, CannedTransport::default(), &["https://a.io/"]);
        assert_eq!(verdict.status, CheckStatus::Skipped);
    }
}

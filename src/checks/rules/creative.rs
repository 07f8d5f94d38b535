//! Ad copy checks.

use crate::checks::{Category, Check, CheckContext, CheckId, Severity, Verdict};
use crate::context::Platform;

/// Hard headline limit per platform, in characters.
fn headline_limit(platform: Platform) -> Option<usize> {
    match platform {
        Platform::Meta => Some(40),
        Platform::Google => Some(30),
        Platform::Linkedin => Some(70),
        _ => None,
    }
}

const CTA_KEYWORDS: &[&str] = &[
    "shop now",
    "learn more",
    "sign up",
    "get started",
    "try free",
    "buy now",
    "download",
    "book now",
    "contact us",
    "get quote",
    "apply now",
    "subscribe",
    "discover",
    "explore",
    "click",
];

/// Headline fits the platform's character limit.
pub struct HeadlineCharLimit;

impl Check for HeadlineCharLimit {
    fn id(&self) -> CheckId {
        CheckId::new("headline_char_limit")
    }
    fn name(&self) -> &str {
        "Headline Character Limit"
    }
    fn category(&self) -> Category {
        Category::Creative
    }
    fn platforms(&self) -> &[Platform] {
        &[Platform::Meta, Platform::Google, Platform::Linkedin]
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let platform = ctx.run.platform;
        let Some(limit) = headline_limit(platform) else {
            return Ok(Verdict::skipped(
                "Headline limit not applicable for this platform",
            ));
        };
        let Some(headline) = ctx.run.campaign.headline.as_deref().filter(|h| !h.is_empty())
        else {
            return Ok(Verdict::warning(
                "Headline not provided; cannot check character limit",
            )
            .with_recommendation("Provide headline text to enable this check"));
        };

        let length = headline.chars().count();
        if length <= limit {
            return Ok(Verdict::passed(format!(
                "Headline is {}/{} characters, within limit",
                length, limit
            )));
        }
        Ok(Verdict::failed(format!(
            "Headline is {} characters, exceeds {} limit of {}",
            length, platform, limit
        ))
        .with_recommendation(format!("Shorten headline to {} characters or fewer", limit))
        .with_affected([headline])
        .with_metadata("length", length)
        .with_metadata("limit", limit)
        .with_metadata("overage", length - limit))
    }
}

/// Ad copy contains a recognizable call to action.
pub struct CtaInCopy;

impl Check for CtaInCopy {
    fn id(&self) -> CheckId {
        CheckId::new("cta_in_copy")
    }
    fn name(&self) -> &str {
        "Call-to-Action Present in Ad Copy"
    }
    fn category(&self) -> Category {
        Category::Creative
    }
    fn severity(&self) -> Severity {
        Severity::Minor
    }
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict> {
        let text = ctx.run.campaign.ad_copy().join(" ").to_lowercase();
        if text.trim().is_empty() {
            return Ok(Verdict::skipped("No ad copy provided; CTA check skipped"));
        }

        let found: Vec<&str> = CTA_KEYWORDS
            .iter()
            .copied()
            .filter(|kw| text.contains(kw))
            .collect();

        match found.first() {
            Some(first) => Ok(Verdict::passed(format!("CTA found in ad copy: '{}'", first))
                .with_metadata("ctas_found", found.clone())),
            None => Ok(Verdict::warning("No clear call-to-action detected in ad copy")
                .with_recommendation(
                    "Add a direct CTA (e.g. 'Shop Now', 'Get Started', 'Learn More') to improve CTR",
                )),
        }
    }
}

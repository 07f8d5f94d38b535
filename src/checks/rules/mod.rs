//! Built-in check catalog.
//!
//! Tier 1 rules are pure functions of the run context. Tier 2 rules read
//! landing pages through the run's fetch cache.

pub mod creative;
pub mod naming;
pub mod page;
pub mod reachability;
pub mod url_structure;
pub mod utm;

use std::collections::HashSet;

use super::Check;
use crate::context::{normalize_host, ParsedUrl};

/// All built-in checks.
pub fn builtin_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(utm::UtmSourcePresent),
        Box::new(utm::UtmMediumPresent),
        Box::new(utm::UtmCampaignPresent),
        Box::new(utm::UtmNoSpaces),
        Box::new(utm::UtmCaseConsistency),
        Box::new(utm::UtmSourceMatchesPlatform),
        Box::new(utm::UtmNoDuplicateParams),
        Box::new(utm::GoogleClickIdOrUtmId),
        Box::new(url_structure::UrlUsesHttps),
        Box::new(url_structure::UrlParseable),
        Box::new(url_structure::UrlNoWhitespace),
        Box::new(url_structure::UrlNoFragment),
        Box::new(url_structure::UrlLength),
        Box::new(url_structure::UrlUniformDomain),
        Box::new(creative::HeadlineCharLimit),
        Box::new(creative::CtaInCopy),
        Box::new(naming::CampaignNamingConvention),
        Box::new(reachability::UrlReachable),
        Box::new(reachability::UrlRedirectDepth),
        Box::new(reachability::UtmPreservedThroughRedirect),
        Box::new(page::SecurityHeaders),
        Box::new(page::OgTagsPresent),
    ]
}

/// First URL for each normalized host, skipping URLs without a host.
///
/// Fetches are shared per host, so every network rule judges the page of
/// this one representative URL. Rules that need a particular kind of URL
/// (tagged, HTTPS) skip hosts whose representative does not qualify.
pub(crate) fn unique_hosts(urls: &[ParsedUrl]) -> Vec<&ParsedUrl> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|u| u.parse_error.is_none() && !u.host.is_empty())
        .filter(|u| seen.insert(normalize_host(&u.host)))
        .collect()
}

//! Fetch results handed to checks.

use reqwest::Url;
use std::collections::BTreeMap;
use std::time::Duration;

/// A landing page response after following redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    /// Header names lowercased.
    pub headers: BTreeMap<String, String>,
    /// Body decoded lossily as UTF-8; empty for HEAD fetches.
    pub body: String,
    pub truncated: bool,
    /// URLs that answered with a redirect, in order.
    pub redirects: Vec<String>,
    pub elapsed: Duration,
}

impl PageResponse {
    /// 2xx or 3xx.
    pub fn is_ok(&self) -> bool {
        (200..400).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.len()
    }

    /// Whether this page was fetched for `url` rather than for another URL
    /// on the same host.
    pub fn answers(&self, url: &str) -> bool {
        Url::parse(url.trim()).is_ok_and(|u| u.as_str() == self.requested_url)
    }
}

/// Result of a fetch through the cache.
///
/// Network failures are an ordinary value, never an error: checks must
/// treat [`FetchOutcome::Unreachable`] as missing data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Response(PageResponse),
    Unreachable { url: String, reason: String },
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&PageResponse> {
        match self {
            FetchOutcome::Response(page) => Some(page),
            FetchOutcome::Unreachable { .. } => None,
        }
    }

    /// Got a response with a 2xx/3xx status.
    pub fn is_ok(&self) -> bool {
        self.response().is_some_and(PageResponse::is_ok)
    }

    /// URL this fetch was issued for.
    pub fn requested_url(&self) -> &str {
        match self {
            FetchOutcome::Response(page) => &page.requested_url,
            FetchOutcome::Unreachable { url, .. } => url,
        }
    }
}

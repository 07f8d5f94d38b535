//! Destination URL parsing.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A destination URL as submitted, with optional ad labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlInput {
    /// Raw URL string.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_set_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
}

impl UrlInput {
    /// Create an input with no ad labels.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// A destination URL broken into the pieces checks look at.
///
/// Parsing never fails outright: a URL that cannot be parsed keeps its raw
/// text and records the reason in `parse_error`, leaving host, path and
/// params empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedUrl {
    pub raw_url: String,
    /// Authority as written, including a non-default port.
    pub host: String,
    pub path: String,
    /// Decoded query parameters; the first occurrence of a key wins.
    pub params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_set_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl ParsedUrl {
    /// Parse a submitted URL.
    pub fn parse(input: &UrlInput) -> Self {
        let raw = input.url.trim().to_string();
        let mut parsed = Self {
            raw_url: raw.clone(),
            ad_name: input.ad_name.clone(),
            ad_set_name: input.ad_set_name.clone(),
            campaign_name: input.campaign_name.clone(),
            ..Default::default()
        };

        match Url::parse(&raw) {
            Ok(url) => {
                let host = url.host_str().unwrap_or_default();
                parsed.host = match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                };
                parsed.path = url.path().to_string();
                for (key, value) in url.query_pairs() {
                    parsed
                        .params
                        .entry(key.into_owned())
                        .or_insert_with(|| value.into_owned());
                }
            }
            Err(e) => parsed.parse_error = Some(e.to_string()),
        }

        parsed
    }

    /// Shorthand for parsing a bare URL string.
    pub fn from_raw(url: &str) -> Self {
        Self::parse(&UrlInput::new(url))
    }

    /// Value of a query parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether a query parameter is present (possibly empty).
    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Query keys that appear more than once in the raw URL.
    pub fn duplicate_params(&self) -> Vec<String> {
        let Ok(url) = Url::parse(&self.raw_url) else {
            return Vec::new();
        };
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (key, _) in url.query_pairs() {
            *counts.entry(key.into_owned()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(k, _)| k)
            .collect()
    }

    /// URL fragment (text after `#`), if any.
    pub fn fragment(&self) -> Option<String> {
        Url::parse(&self.raw_url)
            .ok()
            .and_then(|u| u.fragment().map(String::from))
            .filter(|f| !f.is_empty())
    }

    /// URL scheme, if the URL parsed.
    pub fn scheme(&self) -> Option<String> {
        Url::parse(&self.raw_url).ok().map(|u| u.scheme().to_string())
    }
}

/// Normalize a host for deduplication: lowercase, no trailing dot, no
/// leading `www.`, no default port.
pub fn normalize_host(host: &str) -> String {
    let mut host = host.trim().to_ascii_lowercase();
    for default_port in [":443", ":80"] {
        if let Some(stripped) = host.strip_suffix(default_port) {
            host = stripped.to_string();
        }
    }
    if let Some(stripped) = host.strip_suffix('.') {
        host = stripped.to_string();
    }
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

//! Single-hop HTTP transport.
//!
//! A [`Transport`] performs exactly one request and never follows
//! redirects; the fetch cache walks redirect chains itself so it can record
//! every hop.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Method;
use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use super::FetchMode;

/// One request issued by the fetch cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub mode: FetchMode,
    pub timeout: Duration,
    /// Maximum body bytes to read.
    pub byte_cap: usize,
}

/// Response to a single hop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Header names lowercased.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// The body was cut short by the byte cap or a mid-body read failure.
    pub truncated: bool,
}

/// Something that can issue a single HTTP request.
pub trait Transport: Send + Sync {
    /// Perform the request. Connection failures and timeouts before the
    /// response head arrives are errors.
    fn send(&self, request: &FetchRequest) -> Result<RawResponse>;
}

/// Blocking HTTP transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &FetchRequest) -> Result<RawResponse> {
        let method = match request.mode {
            FetchMode::Head => Method::HEAD,
            FetchMode::Get => Method::GET,
        };

        let mut response = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout)
            .send()
            .with_context(|| format!("request to {} failed", request.url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let (body, truncated) = match request.mode {
            FetchMode::Head => (Vec::new(), false),
            FetchMode::Get => read_capped(&mut response, request.byte_cap),
        };

        Ok(RawResponse {
            status,
            headers,
            body,
            truncated,
        })
    }
}

/// Read at most `cap` bytes. A read error after the head arrived keeps what
/// was read so far and marks the body truncated.
pub(crate) fn read_capped(reader: &mut impl Read, cap: usize) -> (Vec<u8>, bool) {
    let mut body = Vec::new();
    let mut chunk = [0u8; 8192];

    while body.len() < cap {
        let want = chunk.len().min(cap - body.len());
        match reader.read(&mut chunk[..want]) {
            Ok(0) => return (body, false),
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!("body read stopped early: {}", e);
                return (body, true);
            }
        }
    }

    // Hit the cap; anything left unread counts as truncation.
    let mut peek = [0u8; 1];
    let more = matches!(reader.read(&mut peek), Ok(n) if n > 0);
    (body, more)
}

/// Transport that never reaches the network.
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn send(&self, request: &FetchRequest) -> Result<RawResponse> {
        anyhow::bail!("network access disabled (requested {})", request.url)
    }
}

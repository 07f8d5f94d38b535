//! Per-run fetch cache.
//!
//! Network-tier checks often need the same landing page. The cache makes
//! sure each (normalized host, mode) pair is fetched at most once per run:
//! the first caller performs the request while concurrent callers for the
//! same key wait on it and share the result.

use reqwest::Url;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use super::response::{FetchOutcome, PageResponse};
use super::transport::{FetchRequest, OfflineTransport, Transport};
use super::{FetchMode, FetchPolicy};
use crate::context::normalize_host;

type Slot = Arc<OnceLock<Arc<FetchOutcome>>>;

/// Deduplicating fetcher scoped to a single run.
pub struct FetchCache {
    transport: Arc<dyn Transport>,
    policy: FetchPolicy,
    slots: Mutex<HashMap<(String, FetchMode), Slot>>,
    fetches: AtomicUsize,
}

impl FetchCache {
    /// Create a cache over `transport`.
    pub fn new(transport: Arc<dyn Transport>, policy: FetchPolicy) -> Self {
        Self {
            transport,
            policy,
            slots: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A cache whose every fetch is unreachable.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineTransport), FetchPolicy::default())
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetch `url` with the cache's default byte cap and timeout.
    pub fn fetch(&self, url: &str, mode: FetchMode) -> Arc<FetchOutcome> {
        self.fetch_with(url, mode, self.policy.byte_cap, self.policy.timeout)
    }

    /// Fetch `url`, deduplicated by (normalized host, mode).
    ///
    /// When the key was already fetched the stored outcome is returned, even
    /// if it was for a different path or scheme on the same host or used
    /// different limits. Callers that care which URL was fetched compare
    /// against [`PageResponse::requested_url`].
    ///
    /// `timeout` bounds the whole fetch, redirect hops included.
    pub fn fetch_with(
        &self,
        url: &str,
        mode: FetchMode,
        byte_cap: usize,
        timeout: Duration,
    ) -> Arc<FetchOutcome> {
        let parsed = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Arc::new(FetchOutcome::Unreachable {
                    url: url.to_string(),
                    reason: format!("invalid URL: {}", e),
                })
            }
        };
        let Some(host) = parsed.host_str() else {
            return Arc::new(FetchOutcome::Unreachable {
                url: url.to_string(),
                reason: "URL has no host".to_string(),
            });
        };
        let authority = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let key = (normalize_host(&authority), mode);

        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key).or_default().clone()
        };

        slot.get_or_init(|| {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Arc::new(self.perform(parsed, mode, byte_cap, timeout))
        })
        .clone()
    }

    /// Number of distinct fetches performed (redirect hops not counted).
    pub fn network_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Walk the redirect chain within one `timeout` budget. Running out of
    /// budget mid-chain stops at the last response and marks it truncated.
    fn perform(&self, start: Url, mode: FetchMode, byte_cap: usize, timeout: Duration) -> FetchOutcome {
        let requested_url = start.to_string();
        let started = Instant::now();
        let mut current = start;
        let mut redirects = Vec::new();

        loop {
            let request = FetchRequest {
                url: current.to_string(),
                mode,
                timeout: timeout.saturating_sub(started.elapsed()),
                byte_cap,
            };
            let raw = match self.transport.send(&request) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(url = %requested_url, mode = %mode, "fetch failed: {:#}", e);
                    return FetchOutcome::Unreachable {
                        url: requested_url,
                        reason: format!("{:#}", e),
                    };
                }
            };

            let next = if (300..400).contains(&raw.status) && redirects.len() < self.policy.max_redirects {
                raw.headers
                    .get("location")
                    .and_then(|location| current.join(location).ok())
            } else {
                None
            };
            let out_of_time = next.is_some() && started.elapsed() >= timeout;

            match next {
                Some(next) if !out_of_time => {
                    redirects.push(current.to_string());
                    current = next;
                }
                _ => {
                    if out_of_time {
                        tracing::warn!(
                            url = %requested_url,
                            redirects = redirects.len(),
                            "fetch budget spent mid-chain"
                        );
                    } else {
                        tracing::debug!(
                            url = %requested_url,
                            status = raw.status,
                            redirects = redirects.len(),
                            "fetched"
                        );
                    }
                    return FetchOutcome::Response(PageResponse {
                        requested_url,
                        final_url: current.to_string(),
                        status: raw.status,
                        headers: raw.headers,
                        body: String::from_utf8_lossy(&raw.body).into_owned(),
                        truncated: raw.truncated || out_of_time,
                        redirects,
                        elapsed: started.elapsed(),
                    });
                }
            }
        }
    }
}

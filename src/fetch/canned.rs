//! In-memory transport for unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::{FetchRequest, RawResponse, Transport};

/// Serves canned responses keyed by exact URL and records every request.
/// Unknown URLs fail like a refused connection.
#[derive(Default)]
pub(crate) struct CannedTransport {
    pages: HashMap<String, RawResponse>,
    delay: Duration,
    requests: Mutex<Vec<FetchRequest>>,
}

impl CannedTransport {
    pub(crate) fn with(mut self, url: &str, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            RawResponse {
                status,
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
                body: body.as_bytes().to_vec(),
                truncated: false,
            },
        );
        self
    }

    /// Sleep this long before answering each request.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for CannedTransport {
    fn send(&self, request: &FetchRequest) -> anyhow::Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.pages
            .get(&request.url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

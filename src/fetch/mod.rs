//! Shared page fetching for network-tier checks.
//!
//! - [`FetchCache`] - per-run deduplication by (normalized host, mode)
//! - [`Transport`] - single-hop HTTP, with [`HttpTransport`] for real traffic
//! - [`FetchOutcome`] - a response or a tagged unreachable result

pub mod cache;
#[cfg(test)]
pub(crate) mod canned;
pub mod response;
pub mod transport;

use std::fmt;
use std::time::Duration;

pub use cache::FetchCache;
pub use response::{FetchOutcome, PageResponse};
pub use transport::{FetchRequest, HttpTransport, OfflineTransport, RawResponse, Transport};

/// HTTP method used for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// Status and headers only.
    Head,
    /// Status, headers, and a capped body.
    Get,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Head => write!(f, "HEAD"),
            FetchMode::Get => write!(f, "GET"),
        }
    }
}

/// Limits applied to every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub byte_cap: usize,
    pub max_redirects: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            byte_cap: 50 * 1024,
            max_redirects: 10,
        }
    }
}

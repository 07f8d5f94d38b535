//! launchproof - pre-launch QA for paid media campaigns.
//!
//! A run takes a campaign submission (destination URLs plus optional copy and
//! naming metadata), evaluates it against a catalog of checks, and stores a
//! per-check outcome and a weighted readiness score. Compute checks run while
//! the caller waits; network checks that fetch landing pages run afterwards
//! on a background queue.
//!
//! # Modules
//!
//! - [`checks`] - Check contract, registry, and the built-in rules
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading and validation
//! - [`context`] - Submissions, platforms, and parsed URLs
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Per-run landing page fetch cache and HTTP transport
//! - [`lifecycle`] - Run ids, status machine, summaries, and recovery
//! - [`notify`] - Run-complete notifications
//! - [`pipeline`] - Two-phase orchestration and worker pools
//! - [`report`] - Read-only report projection
//! - [`scoring`] - Readiness score
//! - [`store`] - Run persistence
//!
//! # Example
//!
//! ```
//! use launchproof::checks::{CheckDefinition, CheckId, CheckOutcome, Category, Severity, Tier, Verdict};
//! use launchproof::context::Platform;
//! use launchproof::scoring::readiness_score;
//! use std::time::Duration;
//!
//! let definition = CheckDefinition {
//!     check_id: CheckId::new("utm_source_present"),
//!     check_name: "UTM Source Present".into(),
//!     category: Category::Utm,
//!     platforms: vec![Platform::Universal],
//!     severity: Severity::Critical,
//!     tier: Tier::Compute,
//! };
//! let passed = CheckOutcome::new(&definition, Verdict::passed("ok"), Duration::ZERO);
//! let warned = CheckOutcome::new(&definition, Verdict::warning("hm"), Duration::ZERO);
//!
//! assert_eq!(readiness_score(&[passed, warned]), 75.0);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod store;

pub use error::{LaunchproofError, Result};

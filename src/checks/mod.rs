//! Check contract, registry, and built-in catalog.
//!
//! # Overview
//!
//! - **Checks** - Individual validation rules ([`Check`] trait)
//! - **Registry** - Collection of all available checks ([`CheckRegistry`])
//! - **Outcomes** - Per-check results with status and recommendations
//!   ([`CheckOutcome`])
//!
//! # Example
//!
//! ```
//! use launchproof::checks::{CheckRegistry, CheckId, Severity};
//!
//! let registry = CheckRegistry::with_builtins().unwrap();
//! assert!(registry.get(&CheckId::new("utm_source_present")).is_some());
//!
//! assert_eq!(Severity::Critical.weight(), 4);
//! ```

pub mod check;
pub mod outcome;
pub mod registry;
pub mod rules;
pub mod runner;

pub use check::{Category, Check, CheckContext, CheckDefinition, CheckId, Severity, Tier};
pub use outcome::{CheckOutcome, CheckStatus, Verdict};
pub use registry::CheckRegistry;
pub use runner::run_check;

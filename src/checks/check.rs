//! Check definitions.
//!
//! This module provides the core traits and types for defining checks:
//!
//! - [`Check`] - The trait that all checks must implement
//! - [`CheckId`] - Stable identifier for a check
//! - [`Severity`] - Scoring weight class (critical, major, minor)
//! - [`Tier`] - Scheduling tier (pure computation vs. network I/O)
//! - [`CheckDefinition`] - Static metadata describing a check

use serde::{Deserialize, Serialize};
use std::fmt;

use super::outcome::Verdict;
use crate::context::{Platform, RunContext};
use crate::fetch::FetchCache;

/// Stable identifier for a check.
///
/// Published ids never change: they join stored outcomes across catalog
/// versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(pub String);

impl CheckId {
    /// Create a new check ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a check, which sets its scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    /// Points at stake for a check of this severity.
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Critical => 4,
            Severity::Major => 2,
            Severity::Minor => 1,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Major => write!(f, "major"),
            Severity::Minor => write!(f, "minor"),
        }
    }
}

/// Category tag for grouping checks in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Utm,
    Tracking,
    Creative,
    Audience,
    Budget,
    Url,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Utm => "utm",
            Category::Tracking => "tracking",
            Category::Creative => "creative",
            Category::Audience => "audience",
            Category::Budget => "budget",
            Category::Url => "url",
        };
        f.write_str(name)
    }
}

/// Scheduling tier of a check.
///
/// Serialized as its number (1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Pure computation over the run context; no blocking I/O.
    Compute,
    /// Network I/O through the fetch cache; latency in seconds.
    Network,
}

impl Tier {
    pub fn number(&self) -> u8 {
        match self {
            Tier::Compute => 1,
            Tier::Network => 2,
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Tier::Compute),
            2 => Ok(Tier::Network),
            other => Err(format!("unknown tier {} (expected 1 or 2)", other)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Static metadata for a registered check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub check_id: CheckId,
    pub check_name: String,
    pub category: Category,
    pub platforms: Vec<Platform>,
    pub severity: Severity,
    pub tier: Tier,
}

impl CheckDefinition {
    /// Whether this check runs for a run targeting `platform`.
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms
            .iter()
            .any(|p| *p == platform || *p == Platform::Universal)
    }
}

/// What a check receives when it runs.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub run: &'a RunContext,
    /// Per-run fetch cache; the only I/O a check may perform.
    pub fetch: &'a FetchCache,
}

impl<'a> CheckContext<'a> {
    pub fn new(run: &'a RunContext, fetch: &'a FetchCache) -> Self {
        Self { run, fetch }
    }
}

/// A validation rule evaluated against one run.
///
/// `execute` must be free of side effects other than reads through the
/// fetch cache. It may return `Err` or even panic; the wrapper in
/// [`run_check`](super::run_check) turns both into an `error` outcome.
/// Return a skipped verdict when the run has nothing for the check to
/// evaluate.
pub trait Check: Send + Sync {
    /// Stable identifier for this check.
    fn id(&self) -> CheckId;

    /// Human-readable name of the check.
    fn name(&self) -> &str;

    /// Report category.
    fn category(&self) -> Category;

    /// Platforms this check applies to.
    fn platforms(&self) -> &[Platform] {
        &[Platform::Universal]
    }

    /// Scoring severity.
    fn severity(&self) -> Severity;

    /// Scheduling tier.
    fn tier(&self) -> Tier {
        Tier::Compute
    }

    /// Evaluate the run.
    fn execute(&self, ctx: &CheckContext<'_>) -> anyhow::Result<Verdict>;

    /// Collected metadata for this check.
    fn definition(&self) -> CheckDefinition {
        CheckDefinition {
            check_id: self.id(),
            check_name: self.name().to_string(),
            category: self.category(),
            platforms: self.platforms().to_vec(),
            severity: self.severity(),
            tier: self.tier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(platforms: Vec<Platform>) -> CheckDefinition {
        CheckDefinition {
            check_id: CheckId::new("test"),
            check_name: "Test".into(),
            category: Category::Utm,
            platforms,
            severity: Severity::Major,
            tier: Tier::Compute,
        }
    }

    #[test]
    fn check_id_display() {
        assert_eq!(format!("{}", CheckId::new("utm_source_present")), "utm_source_present");
    }

    #[test]
    fn severity_weights() {
        assert_eq!(Severity::Critical.weight(), 4);
        assert_eq!(Severity::Major.weight(), 2);
        assert_eq!(Severity::Minor.weight(), 1);
    }

    #[test]
    fn tier_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Tier::Network).unwrap(), "2");
        let tier: Tier = serde_json::from_str("1").unwrap();
        assert_eq!(tier, Tier::Compute);
        assert!(serde_json::from_str::<Tier>("3").is_err());
    }

    #[test]
    fn universal_set_applies_everywhere() {
        let def = definition(vec![Platform::Meta, Platform::Universal]);
        assert!(def.applies_to(Platform::Google));
        assert!(def.applies_to(Platform::Multi));
    }

    #[test]
    fn platform_specific_set() {
        let def = definition(vec![Platform::Meta]);
        assert!(def.applies_to(Platform::Meta));
        assert!(!def.applies_to(Platform::Google));
    }
}

//! Check verdicts and outcomes.
//!
//! A check produces a [`Verdict`]; the execution wrapper stamps it with the
//! check's metadata and measured duration to form a [`CheckOutcome`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::check::{Category, CheckDefinition, CheckId, Severity, Tier};
use crate::context::Platform;

/// Result status of one check against one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Warning,
    /// The run had nothing for the check to evaluate.
    Skipped,
    /// The check itself could not execute.
    Error,
}

impl CheckStatus {
    /// Whether this outcome counts toward the readiness score.
    pub fn is_scored(&self) -> bool {
        !matches!(self, CheckStatus::Skipped | CheckStatus::Error)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Passed => write!(f, "passed"),
            CheckStatus::Failed => write!(f, "failed"),
            CheckStatus::Warning => write!(f, "warning"),
            CheckStatus::Skipped => write!(f, "skipped"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

/// What a check concluded, before the wrapper adds identity and timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: CheckStatus,
    pub message: String,
    pub recommendation: Option<String>,
    pub affected_items: Vec<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Verdict {
    /// Create a verdict with the given status.
    pub fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            recommendation: None,
            affected_items: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn passed(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Passed, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Failed, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warning, message)
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Skipped, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Error, message)
    }

    /// Add a remediation recommendation.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Add affected items, preserving order.
    pub fn with_affected<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Attach a metadata value.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The recorded result of executing one check for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check_id: CheckId,
    pub check_name: String,
    pub category: Category,
    pub platforms: Vec<Platform>,
    pub severity: Severity,
    pub tier: Tier,
    pub status: CheckStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub affected_items: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Wall-clock time spent in the check, measured by the wrapper.
    #[serde(rename = "duration_us", with = "duration_micros")]
    pub duration: Duration,
}

impl CheckOutcome {
    /// Combine a verdict with its check's metadata and measured duration.
    pub fn new(definition: &CheckDefinition, verdict: Verdict, duration: Duration) -> Self {
        Self {
            check_id: definition.check_id.clone(),
            check_name: definition.check_name.clone(),
            category: definition.category,
            platforms: definition.platforms.clone(),
            severity: definition.severity,
            tier: definition.tier,
            status: verdict.status,
            message: verdict.message,
            recommendation: verdict.recommendation,
            affected_items: verdict.affected_items,
            metadata: verdict.metadata,
            duration,
        }
    }

    /// Duration in whole milliseconds, as shown in reports.
    pub fn execution_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

mod duration_micros {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_micros() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_micros(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> CheckDefinition {
        CheckDefinition {
            check_id: CheckId::new("utm_source_present"),
            check_name: "UTM Source Parameter Present".into(),
            category: Category::Utm,
            platforms: vec![Platform::Universal],
            severity: Severity::Critical,
            tier: Tier::Compute,
        }
    }

    #[test]
    fn verdict_builder() {
        let verdict = Verdict::failed("missing")
            .with_recommendation("add it")
            .with_affected(["https://a.example.com"])
            .with_metadata("count", 1);

        assert_eq!(verdict.status, CheckStatus::Failed);
        assert_eq!(verdict.recommendation.as_deref(), Some("add it"));
        assert_eq!(verdict.affected_items, vec!["https://a.example.com"]);
        assert_eq!(verdict.metadata["count"], 1);
    }

    #[test]
    fn outcome_carries_definition_fields() {
        let outcome = CheckOutcome::new(
            &definition(),
            Verdict::passed("ok"),
            Duration::from_millis(12),
        );
        assert_eq!(outcome.check_id.as_str(), "utm_source_present");
        assert_eq!(outcome.severity, Severity::Critical);
        assert_eq!(outcome.execution_ms(), 12);
    }

    #[test]
    fn outcome_json_uses_micros() {
        let outcome = CheckOutcome::new(
            &definition(),
            Verdict::skipped("nothing to check"),
            Duration::from_micros(1500),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["duration_us"], 1500);
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["tier"], 1);

        let back: CheckOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn scored_statuses() {
        assert!(CheckStatus::Passed.is_scored());
        assert!(CheckStatus::Warning.is_scored());
        assert!(CheckStatus::Failed.is_scored());
        assert!(!CheckStatus::Skipped.is_scored());
        assert!(!CheckStatus::Error.is_scored());
    }
}

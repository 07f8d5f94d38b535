//! Persisted run record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{share_token, RunId, RunStatus, RunSummary, StatusCounts};
use crate::context::Platform;
use crate::error::Result;

/// One QA run as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub user_id: String,
    pub run_name: String,
    pub platform: Platform,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Unguessable token for read-only report links.
    pub share_token: String,
    #[serde(default)]
    pub counts: StatusCounts,
    #[serde(default)]
    pub readiness_score: Option<f64>,
}

impl RunRecord {
    /// A freshly submitted run in `pending`.
    pub fn new(id: RunId, user_id: &str, run_name: &str, platform: Platform) -> Self {
        Self {
            id,
            user_id: user_id.to_string(),
            run_name: run_name.to_string(),
            platform,
            status: RunStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            error_message: None,
            share_token: share_token(),
            counts: StatusCounts::default(),
            readiness_score: None,
        }
    }

    /// Apply a phase summary, enforcing the lifecycle.
    pub fn apply_summary(&mut self, summary: &RunSummary, now: DateTime<Utc>) -> Result<()> {
        self.status = self.status.transition(summary.status)?;
        self.counts = summary.counts;
        self.readiness_score = summary.readiness_score;
        if summary.error_message.is_some() {
            self.error_message = summary.error_message.clone();
        }
        if self.status.is_terminal() {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Move to `failed` with a message.
    pub fn fail(&mut self, message: &str, now: DateTime<Utc>) -> Result<()> {
        self.status = self.status.transition(RunStatus::Failed)?;
        self.error_message = Some(message.to_string());
        self.completed_at = Some(now);
        Ok(())
    }

    /// Whether a `running` run started before `cutoff`.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.status == RunStatus::Running && self.started_at < cutoff
    }
}

//! Run lifecycle state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LaunchproofError, Result};

/// Lifecycle status of a run.
///
/// `pending → running → {completed | failed}`; a pending run may also fail
/// directly when its first phase cannot be orchestrated. Terminal states
/// absorb every further transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// Whether no further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// Whether `self → to` is a legal transition.
    ///
    /// `running → running` is allowed so the partial summary after tier 1
    /// can be rewritten before tier 2 finishes.
    pub fn can_transition_to(&self, to: RunStatus) -> bool {
        matches!(
            (self, to),
            (RunStatus::Pending, RunStatus::Running)
                | (RunStatus::Pending, RunStatus::Failed)
                | (RunStatus::Running, RunStatus::Running)
                | (RunStatus::Running, RunStatus::Completed)
                | (RunStatus::Running, RunStatus::Failed)
        )
    }

    /// Validate and perform a transition.
    pub fn transition(self, to: RunStatus) -> Result<RunStatus> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(LaunchproofError::InvalidTransition { from: self, to })
        }
    }

    /// Coarse progress for status polling.
    pub fn progress_pct(&self) -> u8 {
        match self {
            RunStatus::Pending => 0,
            RunStatus::Running => 60,
            RunStatus::Completed | RunStatus::Failed => 100,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RunStatus; 4] = [
        RunStatus::Pending,
        RunStatus::Running,
        RunStatus::Completed,
        RunStatus::Failed,
    ];

    #[test]
    fn happy_path() {
        let status = RunStatus::Pending
            .transition(RunStatus::Running)
            .and_then(|s| s.transition(RunStatus::Running))
            .and_then(|s| s.transition(RunStatus::Completed))
            .unwrap();
        assert_eq!(status, RunStatus::Completed);
    }

    #[test]
    fn terminal_states_absorb() {
        for terminal in [RunStatus::Completed, RunStatus::Failed] {
            assert!(terminal.is_terminal());
            for to in ALL {
                assert!(terminal.transition(to).is_err(), "{} -> {}", terminal, to);
            }
        }
    }

    #[test]
    fn pending_cannot_complete_directly() {
        assert!(RunStatus::Pending.transition(RunStatus::Completed).is_err());
        assert!(RunStatus::Pending.transition(RunStatus::Failed).is_ok());
    }

    #[test]
    fn progress_values() {
        assert_eq!(RunStatus::Pending.progress_pct(), 0);
        assert_eq!(RunStatus::Running.progress_pct(), 60);
        assert_eq!(RunStatus::Failed.progress_pct(), 100);
    }
}

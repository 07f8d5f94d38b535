//! Recover command implementation.
//!
//! The `launchproof recover` command fails runs that a previous process left
//! `running`. `run` performs the same sweep on startup.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::cli::args::RecoverArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::lifecycle::recover_stale_runs;

use super::dispatcher::{Command, CommandResult};
use super::project::Project;

/// The recover command implementation.
pub struct RecoverCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: RecoverArgs,
}

impl RecoverCommand {
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: RecoverArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for RecoverCommand {
    fn execute(&self, out: &mut Output) -> Result<CommandResult> {
        let project = Project::load(&self.project_root, self.config_override.as_deref())?;
        let minutes = self
            .args
            .stale_after_minutes
            .unwrap_or(project.config().recovery.stale_after_minutes);

        let report = recover_stale_runs(
            &project.store(),
            Utc::now(),
            chrono::Duration::minutes(minutes),
        )?;

        if report.recovered.is_empty() && report.failures.is_empty() {
            out.success("No stale runs");
        }
        if !report.recovered.is_empty() {
            out.warning(&format!("Failed {} stale run(s)", report.recovered.len()));
            for id in &report.recovered {
                out.line(&format!("  {}", id));
            }
        }
        if report.failures.is_empty() {
            return Ok(CommandResult::success());
        }
        out.error(&format!("Could not recover {} run(s)", report.failures.len()));
        for (id, reason) in &report.failures {
            out.line(&format!("  {}: {}", id, reason));
        }
        Ok(CommandResult::failure(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Platform;
    use crate::lifecycle::{RunId, RunRecord, RunStatus, RunSummary, RECOVERY_MESSAGE};
    use crate::store::RunStore;
    use tempfile::TempDir;

    #[test]
    fn fails_running_runs_past_threshold() {
        let temp = TempDir::new().unwrap();
        let store = Project::load(temp.path(), None).unwrap().store();
        let mut record = RunRecord::new(RunId::new(), "u1", "Old", Platform::Tiktok);
        record.started_at = Utc::now() - chrono::Duration::minutes(30);
        let id = record.id.clone();
        store.create_run(&record).unwrap();
        store
            .update_run_summary(&id, &RunSummary::from_outcomes(RunStatus::Running, &[]))
            .unwrap();

        let mut out = Output::buffer();
        let result = RecoverCommand::new(temp.path(), None, RecoverArgs::default())
            .execute(&mut out)
            .unwrap();

        assert!(result.success);
        assert!(out.contents().contains("Failed 1 stale run(s)"));
        let run = store.load_run(&id).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.error_message.as_deref(), Some(RECOVERY_MESSAGE));
    }

    #[test]
    fn nothing_to_recover() {
        let temp = TempDir::new().unwrap();
        let mut out = Output::buffer();
        RecoverCommand::new(temp.path(), None, RecoverArgs::default())
            .execute(&mut out)
            .unwrap();
        assert!(out.contents().contains("No stale runs"));
    }
}

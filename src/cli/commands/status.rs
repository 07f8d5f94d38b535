//! Status command implementation.
//!
//! The `launchproof status` command shows where a run is in its lifecycle.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::args::StatusArgs;
use crate::cli::output::Output;
use crate::error::{LaunchproofError, Result};
use crate::lifecycle::{RunId, RunRecord, RunStatus, StatusCounts};
use crate::store::RunStore;

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::project::Project;

/// Polling view of a run.
#[derive(Debug, Serialize)]
struct StatusView<'a> {
    run_id: &'a RunId,
    status: RunStatus,
    progress_pct: u8,
    readiness_score: Option<f64>,
    counts: &'a StatusCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<&'a str>,
}

impl<'a> From<&'a RunRecord> for StatusView<'a> {
    fn from(run: &'a RunRecord) -> Self {
        Self {
            run_id: &run.id,
            status: run.status,
            progress_pct: run.status.progress_pct(),
            readiness_score: run.readiness_score,
            counts: &run.counts,
            error_message: run.error_message.as_deref(),
        }
    }
}

/// Parse a run id argument, reporting a bad one to the user.
pub(super) fn parse_run_id(raw: &str, out: &mut Output) -> Option<RunId> {
    let id = RunId::parse(raw.trim());
    if id.is_none() {
        out.error(&format!("'{}' is not a run id", raw));
    }
    id
}

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, out: &mut Output) -> Result<CommandResult> {
        let Some(run_id) = parse_run_id(&self.args.run_id, out) else {
            return Ok(CommandResult::failure(2));
        };
        let project = Project::load(&self.project_root, self.config_override.as_deref())?;

        let run = match project.store().load_run(&run_id) {
            Ok(run) => run,
            Err(LaunchproofError::RunNotFound { id }) => {
                out.error(&format!("No run found with id {}", id));
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            out.json(&StatusView::from(&run))?;
        } else {
            display::show_run(out, &run);
            out.field("Progress", &format!("{}%", run.status.progress_pct()));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Platform;
    use tempfile::TempDir;

    fn stored_run(temp: &TempDir) -> RunId {
        let project = Project::load(temp.path(), None).unwrap();
        let record = RunRecord::new(RunId::new(), "u1", "Spring Sale", Platform::Google);
        let id = record.id.clone();
        project.store().create_run(&record).unwrap();
        id
    }

    fn status(temp: &TempDir, run_id: &str, json: bool) -> (CommandResult, String) {
        let args = StatusArgs {
            run_id: run_id.to_string(),
            json,
        };
        let mut out = Output::buffer();
        let result = StatusCommand::new(temp.path(), None, args)
            .execute(&mut out)
            .unwrap();
        (result, out.contents())
    }

    #[test]
    fn shows_pending_run() {
        let temp = TempDir::new().unwrap();
        let id = stored_run(&temp);

        let (result, text) = status(&temp, id.as_str(), false);
        assert!(result.success);
        assert!(text.contains("Spring Sale"));
        assert!(text.contains("Status: pending"));
        assert!(text.contains("Progress: 0%"));
    }

    #[test]
    fn json_has_progress() {
        let temp = TempDir::new().unwrap();
        let id = stored_run(&temp);

        let (_, text) = status(&temp, id.as_str(), true);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["progress_pct"], 0);
        assert!(value.get("error_message").is_none());
    }

    #[test]
    fn unknown_run_fails() {
        let temp = TempDir::new().unwrap();
        let (result, text) = status(&temp, "run_1700000000000_abcdef12", false);
        assert_eq!(result.exit_code, 1);
        assert!(text.contains("No run found"));
    }

    #[test]
    fn malformed_id_is_usage_error() {
        let temp = TempDir::new().unwrap();
        let (result, _) = status(&temp, "../etc/passwd", false);
        assert_eq!(result.exit_code, 2);
    }
}

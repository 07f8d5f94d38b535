//! Report command implementation.
//!
//! The `launchproof report` command prints every outcome of a run.

use std::path::{Path, PathBuf};

use crate::cli::args::ReportArgs;
use crate::cli::output::Output;
use crate::error::{LaunchproofError, Result};
use crate::report::RunReport;

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::project::Project;
use super::status::parse_run_id;

/// The report command implementation.
pub struct ReportCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: ReportArgs,
}

impl ReportCommand {
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: ReportArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ReportCommand {
    fn execute(&self, out: &mut Output) -> Result<CommandResult> {
        let Some(run_id) = parse_run_id(&self.args.run_id, out) else {
            return Ok(CommandResult::failure(2));
        };
        let project = Project::load(&self.project_root, self.config_override.as_deref())?;

        let report = match RunReport::load(&project.store(), &run_id) {
            Ok(report) => report,
            Err(LaunchproofError::RunNotFound { id }) => {
                out.error(&format!("No run found with id {}", id));
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            out.json(&report)?;
        } else {
            display::show_report(out, &report);
        }
        Ok(CommandResult::success())
    }
}

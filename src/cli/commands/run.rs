//! Run command implementation.
//!
//! The `launchproof run` command submits a campaign, prints the compute-tier
//! summary, then waits for the network tier and prints the full report.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::checks::{CheckOutcome, CheckRegistry};
use crate::cli::args::RunArgs;
use crate::cli::output::Output;
use crate::context::load_submission;
use crate::error::{LaunchproofError, Result};
use crate::fetch::{HttpTransport, Transport};
use crate::lifecycle::{RunId, RunStatus, RunSummary};
use crate::pipeline::Pipeline;
use crate::report::RunReport;
use crate::store::RunStore;

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::project::Project;

/// What `run --no-wait --json` prints.
#[derive(Debug, Serialize)]
struct PartialView<'a> {
    run_id: &'a RunId,
    summary: &'a RunSummary,
    outcomes: &'a [CheckOutcome],
}

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: RunArgs,
    transport: Option<Arc<dyn Transport>>,
}

impl RunCommand {
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
            transport: None,
        }
    }

    /// Fetch landing pages through `transport` instead of HTTP.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn build_pipeline(&self, project: &Project) -> Result<Pipeline> {
        let registry = Arc::new(CheckRegistry::with_builtins()?);
        let store: Arc<dyn RunStore> = Arc::new(project.store());
        let transport: Arc<dyn Transport> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(HttpTransport::new(&project.config().fetch.user_agent)?),
        };
        Ok(
            Pipeline::new(registry, store, transport, project.config().pipeline_settings())
                .with_notifier(project.notifier()?),
        )
    }

    fn show_partial(&self, out: &mut Output, run_id: &RunId, summary: &RunSummary) {
        out.header(&format!("Run {}", run_id));
        out.field("Compute checks", &display::counts_line(&summary.counts));
        out.field("Partial readiness", &display::score_text(summary.readiness_score));
        if let Some(message) = &summary.error_message {
            out.error(message);
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, out: &mut Output) -> Result<CommandResult> {
        let project = Project::load(&self.project_root, self.config_override.as_deref())?;

        let submission = match load_submission(&self.args.submission) {
            Ok(submission) => submission,
            Err(e @ LaunchproofError::ConfigNotFound { .. })
            | Err(e @ LaunchproofError::ConfigParseError { .. }) => {
                out.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };

        let pipeline = self.build_pipeline(&project)?;
        let recovered = pipeline.recover()?;
        if !recovered.recovered.is_empty() {
            tracing::warn!(count = recovered.recovered.len(), "failed stale runs from a previous process");
        }
        if !recovered.failures.is_empty() {
            tracing::warn!(count = recovered.failures.len(), "some stale runs could not be recovered");
        }

        let handle = match pipeline.submit(&submission, &self.args.user) {
            Ok(handle) => handle,
            Err(e @ LaunchproofError::InvalidSubmission { .. }) => {
                out.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };
        let run_id = handle.run_id.clone();

        if self.args.no_wait {
            if self.args.json {
                out.json(&PartialView {
                    run_id: &run_id,
                    summary: &handle.partial,
                    outcomes: &handle.outcomes,
                })?;
            } else {
                self.show_partial(out, &run_id, &handle.partial);
                let hint = format!(
                    "Network checks continue in the background; see `launchproof status {}`",
                    run_id
                );
                let styled = out.theme().dim.apply_to(hint).to_string();
                out.line(&styled);
            }
            return Ok(if handle.partial.status == RunStatus::Failed {
                CommandResult::failure(1)
            } else {
                CommandResult::success()
            });
        }

        if !self.args.json {
            self.show_partial(out, &run_id, &handle.partial);
            out.line("");
        }

        let status = handle.wait();
        let report = RunReport::load(pipeline.store().as_ref(), &run_id)?;
        if self.args.json {
            out.json(&report)?;
        } else {
            display::show_report(out, &report);
        }

        match status {
            Some(RunStatus::Completed) => Ok(CommandResult::success()),
            _ => Ok(CommandResult::failure(1)),
        }
    }
}

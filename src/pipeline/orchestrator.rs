//! Two-phase run orchestration.
//!
//! Phase 1 runs the compute tier while the caller waits and records a
//! partial summary. Phase 2 runs the network tier on the background queue,
//! merges both phases into the final summary and notifies. Any failure in
//! the orchestration itself (as opposed to inside a check) fails the run
//! with a stored message, so every run ends `completed` or `failed`.

use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use super::background::BackgroundQueue;
use super::pool::execute_batch;
use crate::checks::{Check, CheckContext, CheckOutcome, CheckRegistry, Tier};
use crate::context::{RunContext, RunSubmission};
use crate::error::Result;
use crate::fetch::{FetchCache, FetchPolicy, Transport};
use crate::lifecycle::{recover_stale_runs, RecoveryReport, RunId, RunRecord, RunStatus, RunSummary};
use crate::notify::{LogNotifier, Notifier, RunNotification};
use crate::store::RunStore;

/// Tunables for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub tier1_workers: usize,
    pub tier2_workers: usize,
    pub background_workers: usize,
    pub max_urls_per_run: usize,
    pub fetch: FetchPolicy,
    /// A `running` run older than this is failed by the startup sweep.
    pub stale_after: chrono::Duration,
    pub report_base_url: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tier1_workers: 8,
            tier2_workers: 4,
            background_workers: 2,
            max_urls_per_run: 50,
            fetch: FetchPolicy::default(),
            stale_after: chrono::Duration::minutes(10),
            report_base_url: "http://localhost:5173".to_string(),
        }
    }
}

/// The caller's view of a submitted run.
pub struct RunHandle {
    pub run_id: RunId,
    /// Summary written after phase 1 (or the failure summary).
    pub partial: RunSummary,
    /// Phase-1 outcomes.
    pub outcomes: Vec<CheckOutcome>,
    done: Option<Receiver<RunStatus>>,
}

impl RunHandle {
    /// Block until phase 2 settles and return the terminal status.
    ///
    /// Returns `None` if the background job vanished without reporting;
    /// the stored run then stays `running` until the next recovery sweep.
    pub fn wait(self) -> Option<RunStatus> {
        match self.done {
            Some(done) => done.recv().ok(),
            None => Some(self.partial.status),
        }
    }
}

/// Runs submissions through both check tiers.
pub struct Pipeline {
    registry: Arc<CheckRegistry>,
    store: Arc<dyn RunStore>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    settings: PipelineSettings,
    queue: BackgroundQueue,
}

impl Pipeline {
    /// Create a pipeline that notifies through the log.
    pub fn new(
        registry: Arc<CheckRegistry>,
        store: Arc<dyn RunStore>,
        transport: Arc<dyn Transport>,
        settings: PipelineSettings,
    ) -> Self {
        let queue = BackgroundQueue::new(settings.background_workers);
        Self {
            registry,
            store,
            transport,
            notifier: Arc::new(LogNotifier),
            settings,
            queue,
        }
    }

    /// Replace the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn RunStore> {
        &self.store
    }

    /// Fail runs orphaned by a previous process. Call before submitting.
    pub fn recover(&self) -> Result<RecoveryReport> {
        recover_stale_runs(self.store.as_ref(), Utc::now(), self.settings.stale_after)
    }

    /// Validate and start a run.
    ///
    /// Returns after phase 1 with the partial summary; phase 2 continues
    /// on the background queue. An invalid submission is rejected before
    /// any run is created.
    pub fn submit(&self, submission: &RunSubmission, user_id: &str) -> Result<RunHandle> {
        submission.validate(self.settings.max_urls_per_run)?;

        let record = RunRecord::new(RunId::new(), user_id, &submission.run_name, submission.platform);
        self.store.create_run(&record)?;
        let run_id = record.id.clone();
        tracing::info!(run = %run_id, platform = %submission.platform, urls = submission.urls.len(), "run created");

        let ctx = Arc::new(RunContext::from_submission(run_id.clone(), user_id, submission));
        let fetch = Arc::new(FetchCache::new(
            Arc::clone(&self.transport),
            self.settings.fetch.clone(),
        ));

        let (outcomes, partial) = match self.phase_one(&ctx, &fetch) {
            Ok(done) => done,
            Err(e) => {
                let message = format!("Tier 1 checks failed: {}", e);
                tracing::error!(run = %run_id, "{}", message);
                let summary = self.fail_run(&run_id, &message);
                return Ok(RunHandle {
                    run_id,
                    partial: summary,
                    outcomes: Vec::new(),
                    done: None,
                });
            }
        };

        let (tx, rx) = mpsc::channel();
        let job = PhaseTwo {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            ctx,
            fetch,
            tier1: outcomes.clone(),
            run_name: submission.run_name.clone(),
            workers: self.settings.tier2_workers,
            report_base_url: self.settings.report_base_url.clone(),
        };

        if let Err(e) = self.queue.submit(move || {
            let status = job.run();
            let _ = tx.send(status);
        }) {
            let message = format!("Could not schedule background checks: {}", e);
            let summary = self.fail_run(&run_id, &message);
            return Ok(RunHandle {
                run_id,
                partial: summary,
                outcomes,
                done: None,
            });
        }

        Ok(RunHandle {
            run_id,
            partial,
            outcomes,
            done: Some(rx),
        })
    }

    fn phase_one(
        &self,
        ctx: &RunContext,
        fetch: &FetchCache,
    ) -> Result<(Vec<CheckOutcome>, RunSummary)> {
        let checks = sorted(self.registry.checks_for(ctx.platform, Some(Tier::Compute)));
        let outcomes = execute_batch(&checks, CheckContext::new(ctx, fetch), self.settings.tier1_workers);
        self.store.write_outcomes(&ctx.run_id, &outcomes)?;

        let summary = RunSummary::from_outcomes(RunStatus::Running, &outcomes);
        self.store.update_run_summary(&ctx.run_id, &summary)?;
        tracing::info!(
            run = %ctx.run_id,
            checks = outcomes.len(),
            score = summary.readiness_score.unwrap_or_default(),
            "tier 1 complete"
        );
        Ok((outcomes, summary))
    }

    fn fail_run(&self, run_id: &RunId, message: &str) -> RunSummary {
        if let Err(e) = self.store.mark_failed(run_id, message) {
            tracing::error!(run = %run_id, "could not mark run failed: {}", e);
        }
        let mut summary = RunSummary::from_outcomes(RunStatus::Failed, &[]);
        summary.readiness_score = None;
        summary.error_message = Some(message.to_string());
        summary
    }
}

/// Everything phase 2 needs, owned so it can move to a worker thread.
struct PhaseTwo {
    registry: Arc<CheckRegistry>,
    store: Arc<dyn RunStore>,
    notifier: Arc<dyn Notifier>,
    ctx: Arc<RunContext>,
    fetch: Arc<FetchCache>,
    tier1: Vec<CheckOutcome>,
    run_name: String,
    workers: usize,
    report_base_url: String,
}

impl PhaseTwo {
    fn run(self) -> RunStatus {
        let run_id = self.ctx.run_id.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.execute()))
            .unwrap_or_else(|_| Err(anyhow::anyhow!("background task panicked").into()));

        match result {
            Ok(summary) => {
                self.notify(&summary);
                RunStatus::Completed
            }
            Err(e) => {
                let message = format!("Background checks failed: {}", e);
                tracing::error!(run = %run_id, "{}", message);
                if let Err(e) = self.store.mark_failed(&run_id, &message) {
                    tracing::error!(run = %run_id, "could not mark run failed: {}", e);
                }
                RunStatus::Failed
            }
        }
    }

    fn execute(&self) -> Result<RunSummary> {
        let ctx = self.ctx.as_ref();
        let checks = sorted(self.registry.checks_for(ctx.platform, Some(Tier::Network)));
        let tier2 = execute_batch(&checks, CheckContext::new(ctx, &self.fetch), self.workers);
        self.store.write_outcomes(&ctx.run_id, &tier2)?;

        let mut all = self.tier1.clone();
        all.extend(tier2);
        let summary = RunSummary::from_outcomes(RunStatus::Completed, &all);
        self.store.update_run_summary(&ctx.run_id, &summary)?;
        tracing::info!(
            run = %ctx.run_id,
            checks = all.len(),
            fetches = self.fetch.network_calls(),
            score = summary.readiness_score.unwrap_or_default(),
            "run complete"
        );
        Ok(summary)
    }

    fn notify(&self, summary: &RunSummary) {
        let notification = RunNotification::new(
            &self.ctx.user_id,
            &self.ctx.run_id,
            &self.run_name,
            summary.readiness_score.unwrap_or_default(),
            &self.report_base_url,
        );
        if let Err(e) = self.notifier.notify(&notification) {
            tracing::warn!(run = %self.ctx.run_id, "notification failed: {:#}", e);
        }
    }
}

fn sorted(mut checks: Vec<Arc<dyn Check>>) -> Vec<Arc<dyn Check>> {
    checks.sort_by_key(|c| c.id());
    checks
}

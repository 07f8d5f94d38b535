//! Run-complete notifications.
//!
//! The pipeline calls [`Notifier::notify`] once per completed run and only
//! logs a returned error; a failing notifier never affects the run.

pub mod email;
pub mod slack;

use serde::Serialize;
use std::sync::Arc;

use crate::lifecycle::RunId;

pub use email::EmailNotifier;
pub use slack::SlackNotifier;

/// What a notifier is told about a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunNotification {
    pub user_id: String,
    pub run_id: RunId,
    pub run_name: String,
    pub readiness_score: f64,
    /// Link to the full report.
    pub report_url: String,
}

impl RunNotification {
    /// Build a notification whose report link hangs off `report_base_url`.
    pub fn new(
        user_id: &str,
        run_id: &RunId,
        run_name: &str,
        readiness_score: f64,
        report_base_url: &str,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            run_id: run_id.clone(),
            run_name: run_name.to_string(),
            readiness_score,
            report_url: format!(
                "{}/runs/{}/report",
                report_base_url.trim_end_matches('/'),
                run_id
            ),
        }
    }
}

/// Receives run-complete events.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &RunNotification) -> anyhow::Result<()>;
}

/// Emits a tracing event. Used when no channel is configured.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &RunNotification) -> anyhow::Result<()> {
        tracing::info!(
            run = %notification.run_id,
            user = %notification.user_id,
            score = notification.readiness_score,
            report = %notification.report_url,
            "run complete: {}",
            notification.run_name
        );
        Ok(())
    }
}

/// Delivers to every configured channel. One channel failing does not stop
/// the others; the failures are reported together.
pub struct FanoutNotifier {
    channels: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(channels: Vec<Arc<dyn Notifier>>) -> Self {
        Self { channels }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: &RunNotification) -> anyhow::Result<()> {
        let failures: Vec<String> = self
            .channels
            .iter()
            .filter_map(|channel| channel.notify(notification).err())
            .map(|e| format!("{:#}", e))
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "{} of {} notification channel(s) failed: {}",
                failures.len(),
                self.channels.len(),
                failures.join("; ")
            )
        }
    }
}

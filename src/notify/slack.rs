//! Slack incoming-webhook notifier.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

use super::{Notifier, RunNotification};

/// Posts a Block Kit summary to a Slack incoming webhook.
pub struct SlackNotifier {
    webhook_url: String,
    client: reqwest::blocking::Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

/// Readiness bucket shown next to the score.
pub fn score_label(score: f64) -> (&'static str, &'static str) {
    let rounded = score.round();
    if rounded >= 80.0 {
        (":white_check_mark:", "Ready to launch")
    } else if rounded >= 60.0 {
        (":warning:", "Needs attention")
    } else {
        (":rotating_light:", "Critical issues found")
    }
}

/// Block Kit payload for a finished run.
pub fn build_payload(notification: &RunNotification) -> Value {
    let (emoji, label) = score_label(notification.readiness_score);
    let score = notification.readiness_score.round();
    json!({
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("{} *QA Run Complete*: {}", emoji, notification.run_name),
                },
            },
            {
                "type": "section",
                "fields": [
                    {"type": "mrkdwn", "text": format!("*Score*\n{}/100", score)},
                    {"type": "mrkdwn", "text": format!("*Status*\n{}", label)},
                ],
            },
            {
                "type": "actions",
                "elements": [
                    {
                        "type": "button",
                        "text": {"type": "plain_text", "text": "View Report"},
                        "url": notification.report_url,
                        "style": "primary",
                    }
                ],
            },
        ]
    })
}

impl Notifier for SlackNotifier {
    fn notify(&self, notification: &RunNotification) -> Result<()> {
        self.client
            .post(&self.webhook_url)
            .json(&build_payload(notification))
            .send()
            .context("Failed to reach Slack webhook")?
            .error_for_status()
            .context("Slack webhook rejected the message")?;
        tracing::debug!(run = %notification.run_id, "slack notification sent");
        Ok(())
    }
}

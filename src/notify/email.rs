//! Run-complete email through the Resend REST API.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

use super::slack::score_label;
use super::{Notifier, RunNotification};
use crate::config::EmailConfig;

/// Sends one HTML email per completed run.
pub struct EmailNotifier {
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
    client: reqwest::blocking::Client,
}

impl EmailNotifier {
    /// Build from settings. `None` when no recipient or API key is set.
    pub fn from_config(config: &EmailConfig, timeout: Duration) -> Result<Option<Self>> {
        let (Some(to), Some(api_key)) = (&config.to, &config.api_key) else {
            return Ok(None);
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Some(Self {
            endpoint: config.endpoint.clone(),
            api_key: api_key.clone(),
            from: config.from.clone(),
            to: to.clone(),
            client,
        }))
    }
}

/// Badge colour for a score, matching the label buckets.
fn score_color(score: f64) -> &'static str {
    let rounded = score.round();
    if rounded >= 80.0 {
        "#22c55e"
    } else if rounded >= 60.0 {
        "#f59e0b"
    } else {
        "#ef4444"
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_html(notification: &RunNotification) -> String {
    let score = notification.readiness_score.round();
    let color = score_color(notification.readiness_score);
    let (_, label) = score_label(notification.readiness_score);
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#f8fafc;margin:0;padding:32px 16px">
  <div style="max-width:520px;margin:0 auto;background:#fff;border-radius:16px;border:1px solid #e2e8f0">
    <div style="background:#1e40af;padding:24px 32px">
      <p style="color:#fff;font-size:18px;font-weight:700;margin:0">LaunchProof</p>
      <p style="color:#bfdbfe;font-size:13px;margin:4px 0 0">Pre-launch QA for paid media</p>
    </div>
    <div style="padding:32px">
      <p style="color:#0f172a;font-size:16px;font-weight:600;margin:0 0 4px">Your QA run is complete</p>
      <p style="color:#64748b;font-size:14px;margin:0 0 24px">{name}</p>
      <div style="text-align:center;background:#f8fafc;border-radius:12px;padding:24px;margin-bottom:24px">
        <p style="color:{color};font-size:56px;font-weight:900;margin:0;line-height:1">{score}</p>
        <p style="color:{color};font-size:13px;font-weight:600;margin:6px 0 0">{label}</p>
      </div>
      <a href="{url}" style="display:block;text-align:center;background:#2563eb;color:#fff;text-decoration:none;font-weight:600;font-size:14px;padding:14px;border-radius:10px">View Full Report</a>
    </div>
  </div>
</body>
</html>
"#,
        name = escape_html(&notification.run_name),
        color = color,
        score = score,
        label = label,
        url = escape_html(&notification.report_url),
    )
}

/// Resend request body.
pub fn build_email(notification: &RunNotification, from: &str, to: &str) -> Value {
    json!({
        "from": from,
        "to": [to],
        "subject": format!(
            "QA Complete: {} - Score {}/100",
            notification.run_name,
            notification.readiness_score.round()
        ),
        "html": render_html(notification),
    })
}

impl Notifier for EmailNotifier {
    fn notify(&self, notification: &RunNotification) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_email(notification, &self.from, &self.to))
            .send()
            .context("Failed to reach email API")?
            .error_for_status()
            .context("Email API rejected the message")?;
        tracing::debug!(run = %notification.run_id, to = %self.to, "email notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::RunId;
    use httpmock::prelude::*;

    fn notification(name: &str, score: f64) -> RunNotification {
        RunNotification::new("u", &RunId::new(), name, score, "http://localhost:5173")
    }

    fn config(endpoint: String) -> EmailConfig {
        EmailConfig {
            to: Some("ops@example.com".into()),
            api_key: Some("re_test".into()),
            endpoint,
            ..EmailConfig::default()
        }
    }

    #[test]
    fn disabled_without_recipient_or_key() {
        let mut email = EmailConfig::default();
        email.api_key = Some("re_test".into());
        assert!(EmailNotifier::from_config(&email, Duration::from_secs(1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn body_has_subject_recipient_and_link() {
        let n = notification("Spring <launch>", 81.6);
        let body = build_email(&n, "LaunchProof <qa@example.com>", "ops@example.com");

        assert_eq!(body["to"][0], "ops@example.com");
        assert_eq!(body["subject"], "QA Complete: Spring <launch> - Score 82/100");
        let html = body["html"].as_str().unwrap();
        assert!(html.contains("Spring &lt;launch&gt;"));
        assert!(html.contains("Ready to launch"));
        assert!(html.contains("#22c55e"));
        assert!(html.contains(&n.report_url));
    }

    #[test]
    fn posts_with_bearer_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_test");
            then.status(200).body(r#"{"id":"email_1"}"#);
        });

        let notifier = EmailNotifier::from_config(&config(server.url("/emails")), Duration::from_secs(5))
            .unwrap()
            .unwrap();
        notifier.notify(&notification("Spring", 55.0)).unwrap();
        mock.assert_calls(1);
    }

    #[test]
    fn rejected_message_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/emails");
            then.status(422);
        });

        let notifier = EmailNotifier::from_config(&config(server.url("/emails")), Duration::from_secs(5))
            .unwrap()
            .unwrap();
        let err = notifier.notify(&notification("Spring", 55.0)).unwrap_err();
        assert!(format!("{:#}", err).contains("rejected"));
    }
}

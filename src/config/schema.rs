//! Settings file schema.
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchPolicy;
use crate::pipeline::PipelineSettings;

/// Root of `.launchproof/config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchproofConfig {
    /// Parallel workers for compute-tier checks.
    pub tier1_workers: usize,
    /// Parallel workers for network-tier checks.
    pub tier2_workers: usize,
    /// Threads running phase-2 jobs.
    pub background_workers: usize,
    pub max_urls_per_run: usize,
    /// Where run records live, relative to the project root.
    pub store_dir: PathBuf,
    pub fetch: FetchConfig,
    pub recovery: RecoveryConfig,
    pub notifications: NotificationConfig,
}

impl Default for LaunchproofConfig {
    fn default() -> Self {
        Self {
            tier1_workers: 8,
            tier2_workers: 4,
            background_workers: 2,
            max_urls_per_run: 50,
            store_dir: PathBuf::from(".launchproof/runs"),
            fetch: FetchConfig::default(),
            recovery: RecoveryConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

/// Landing page fetch limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub byte_cap: usize,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            byte_cap: 51_200,
            max_redirects: 10,
            user_agent: "LaunchProof-QA/1.0 (pre-launch campaign checker)".to_string(),
        }
    }
}

/// Startup recovery sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub stale_after_minutes: i64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            stale_after_minutes: 10,
        }
    }
}

/// Run-complete notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_webhook_url: Option<String>,
    /// Base URL for report links in notifications.
    pub report_base_url: String,
    pub email: EmailConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            slack_webhook_url: None,
            report_base_url: "http://localhost:5173".to_string(),
            email: EmailConfig::default(),
        }
    }
}

/// Run-complete email through the Resend API. Sent only when both `to`
/// and `api_key` are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub from: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            to: None,
            from: "LaunchProof <onboarding@resend.dev>".to_string(),
            api_key: None,
            endpoint: "https://api.resend.com/emails".to_string(),
        }
    }
}

impl EmailConfig {
    pub fn is_enabled(&self) -> bool {
        self.to.is_some() && self.api_key.is_some()
    }
}

impl LaunchproofConfig {
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(self.fetch.timeout_secs),
            byte_cap: self.fetch.byte_cap,
            max_redirects: self.fetch.max_redirects,
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            tier1_workers: self.tier1_workers,
            tier2_workers: self.tier2_workers,
            background_workers: self.background_workers,
            max_urls_per_run: self.max_urls_per_run,
            fetch: self.fetch_policy(),
            stale_after: chrono::Duration::minutes(self.recovery.stale_after_minutes),
            report_base_url: self.notifications.report_base_url.clone(),
        }
    }
}

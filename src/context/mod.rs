//! Run input: the immutable context every check reads.
//!
//! A [`RunContext`] is built once per run from a [`RunSubmission`] and
//! shared read-only (behind an `Arc`) with every check in both phases.

pub mod platform;
pub mod submission;
pub mod url;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lifecycle::RunId;

pub use platform::Platform;
pub use submission::{load_submission, parse_submission, RunSubmission};
pub use url::{normalize_host, ParsedUrl, UrlInput};

/// Campaign metadata and creative text supplied with a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetadata {
    pub campaign_name: Option<String>,
    pub objective: Option<String>,
    pub industry_vertical: Option<String>,
    pub headline: Option<String>,
    pub primary_text: Option<String>,
    pub description: Option<String>,
}

impl CampaignMetadata {
    /// All creative text fields that are present, in display order.
    pub fn ad_copy(&self) -> Vec<&str> {
        [&self.headline, &self.primary_text, &self.description]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect()
    }
}

/// Everything a check may look at for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub run_id: RunId,
    pub user_id: String,
    pub platform: Platform,
    pub urls: Vec<ParsedUrl>,
    pub campaign: CampaignMetadata,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RunContext {
    /// Create a context with no campaign metadata.
    pub fn new(run_id: RunId, platform: Platform, urls: Vec<ParsedUrl>) -> Self {
        Self {
            run_id,
            user_id: String::new(),
            platform,
            urls,
            campaign: CampaignMetadata::default(),
            extra: BTreeMap::new(),
        }
    }

    /// Build the context for a validated submission.
    pub fn from_submission(run_id: RunId, user_id: &str, submission: &RunSubmission) -> Self {
        Self {
            run_id,
            user_id: user_id.to_string(),
            platform: submission.platform,
            urls: submission.urls.iter().map(ParsedUrl::parse).collect(),
            campaign: CampaignMetadata {
                campaign_name: submission.campaign_name.clone(),
                objective: submission.campaign_objective.clone(),
                industry_vertical: submission.industry_vertical.clone(),
                headline: submission.headline.clone(),
                primary_text: submission.primary_text.clone(),
                description: submission.description.clone(),
            },
            extra: submission.extra.clone(),
        }
    }

    /// Attach campaign metadata.
    pub fn with_campaign(mut self, campaign: CampaignMetadata) -> Self {
        self.campaign = campaign;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_submission_parses_every_url() {
        let mut submission = RunSubmission::new(
            "launch",
            Platform::Google,
            vec![
                UrlInput::new("https://a.example.com/?utm_source=google"),
                UrlInput::new("not a url"),
            ],
        );
        submission.headline = Some("Save 20%".into());

        let ctx = RunContext::from_submission(RunId::new(), "user-1", &submission);
        assert_eq!(ctx.urls.len(), 2);
        assert_eq!(ctx.urls[0].param("utm_source"), Some("google"));
        assert!(ctx.urls[1].parse_error.is_some());
        assert_eq!(ctx.campaign.headline.as_deref(), Some("Save 20%"));
        assert_eq!(ctx.user_id, "user-1");
    }

    #[test]
    fn ad_copy_skips_missing_fields() {
        let campaign = CampaignMetadata {
            headline: Some("Hello".into()),
            description: Some("World".into()),
            ..Default::default()
        };
        assert_eq!(campaign.ad_copy(), vec!["Hello", "World"]);
    }
}

//! Run submission input and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::platform::Platform;
use super::url::UrlInput;
use crate::error::{LaunchproofError, Result};

/// What a caller submits to start a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSubmission {
    pub run_name: String,
    pub platform: Platform,
    pub urls: Vec<UrlInput>,
    #[serde(default)]
    pub campaign_name: Option<String>,
    /// awareness | traffic | conversion | retargeting
    #[serde(default)]
    pub campaign_objective: Option<String>,
    /// ecommerce | saas | lead_gen | app_install
    #[serde(default)]
    pub industry_vertical: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub primary_text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Fields not otherwise modeled, passed through to checks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RunSubmission {
    /// Create a submission with no campaign metadata.
    pub fn new(run_name: impl Into<String>, platform: Platform, urls: Vec<UrlInput>) -> Self {
        Self {
            run_name: run_name.into(),
            platform,
            urls,
            campaign_name: None,
            campaign_objective: None,
            industry_vertical: None,
            headline: None,
            primary_text: None,
            description: None,
            extra: BTreeMap::new(),
        }
    }

    /// Reject submissions that must not create a run.
    pub fn validate(&self, max_urls: usize) -> Result<()> {
        if self.run_name.trim().is_empty() {
            return Err(invalid("Run name is required"));
        }
        if self.urls.is_empty() {
            return Err(invalid("At least one URL is required"));
        }
        if self.urls.len() > max_urls {
            return Err(invalid(format!("Maximum {} URLs per run", max_urls)));
        }
        if self.urls.iter().any(|u| u.url.trim().is_empty()) {
            return Err(invalid("URLs must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> LaunchproofError {
    LaunchproofError::InvalidSubmission {
        message: message.into(),
    }
}

/// Load a submission from a YAML or JSON file.
pub fn load_submission(path: &Path) -> Result<RunSubmission> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LaunchproofError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LaunchproofError::Io(e)
        }
    })?;

    parse_submission(&content, path)
}

/// Parse submission content; JSON is accepted as a subset of YAML.
pub fn parse_submission(content: &str, source_path: &Path) -> Result<RunSubmission> {
    serde_yaml::from_str(content).map_err(|e| LaunchproofError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn submission(urls: usize) -> RunSubmission {
        RunSubmission::new(
            "Spring launch",
            Platform::Meta,
            (0..urls)
                .map(|i| UrlInput::new(format!("https://example.com/{}", i)))
                .collect(),
        )
    }

    #[test]
    fn accepts_within_bounds() {
        assert!(submission(1).validate(50).is_ok());
        assert!(submission(50).validate(50).is_ok());
    }

    #[test]
    fn rejects_empty_url_list() {
        let err = submission(0).validate(50).unwrap_err();
        assert!(err.to_string().contains("At least one URL"));
    }

    #[test]
    fn rejects_too_many_urls() {
        let err = submission(51).validate(50).unwrap_err();
        assert!(err.to_string().contains("Maximum 50"));
    }

    #[test]
    fn rejects_blank_run_name() {
        let mut s = submission(1);
        s.run_name = "  ".into();
        assert!(s.validate(50).is_err());
    }

    #[test]
    fn parses_yaml_submission() {
        let yaml = r#"
run_name: Q2 launch
platform: google
urls:
  - url: https://example.com/?utm_source=google
    ad_name: text_ad_1
headline: Big sale
"#;
        let s = parse_submission(yaml, &PathBuf::from("run.yml")).unwrap();
        assert_eq!(s.platform, Platform::Google);
        assert_eq!(s.urls.len(), 1);
        assert_eq!(s.urls[0].ad_name.as_deref(), Some("text_ad_1"));
        assert_eq!(s.headline.as_deref(), Some("Big sale"));
    }

    #[test]
    fn parses_json_submission() {
        let json = r#"{"run_name": "x", "platform": "tiktok", "urls": [{"url": "https://a.io"}]}"#;
        let s = parse_submission(json, &PathBuf::from("run.json")).unwrap();
        assert_eq!(s.platform, Platform::Tiktok);
    }

    #[test]
    fn unknown_platform_is_parse_error() {
        let yaml = "run_name: x\nplatform: myspace\nurls: []\n";
        let err = parse_submission(yaml, &PathBuf::from("run.yml")).unwrap_err();
        assert!(matches!(err, LaunchproofError::ConfigParseError { .. }));
    }
}

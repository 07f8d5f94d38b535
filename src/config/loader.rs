//! Settings file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use super::schema::LaunchproofConfig;
use super::validator::validate;
use crate::error::{LaunchproofError, Result};

/// Directory holding project settings and run data.
pub const PROJECT_DIR: &str = ".launchproof";

/// Environment variable overriding `notifications.slack_webhook_url`.
pub const ENV_SLACK_WEBHOOK: &str = "LAUNCHPROOF_SLACK_WEBHOOK_URL";

/// Environment variable overriding `notifications.email.api_key`.
pub const ENV_RESEND_API_KEY: &str = "LAUNCHPROOF_RESEND_API_KEY";

/// Environment variable overriding `store_dir`.
pub const ENV_STORE_DIR: &str = "LAUNCHPROOF_STORE_DIR";

/// Default settings path for a project.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join("config.yml")
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.launchproof` directory first, then `.git`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load a single settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<LaunchproofConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LaunchproofError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LaunchproofError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML settings. Empty content yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<LaunchproofConfig> {
    if content.trim().is_empty() {
        return Ok(LaunchproofConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| LaunchproofError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    config: &mut LaunchproofConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(url) = lookup(ENV_SLACK_WEBHOOK).filter(|v| !v.trim().is_empty()) {
        config.notifications.slack_webhook_url = Some(url);
    }
    if let Some(key) = lookup(ENV_RESEND_API_KEY).filter(|v| !v.trim().is_empty()) {
        config.notifications.email.api_key = Some(key);
    }
    if let Some(dir) = lookup(ENV_STORE_DIR).filter(|v| !v.trim().is_empty()) {
        config.store_dir = PathBuf::from(dir);
    }
}

/// Load settings for a project.
///
/// An explicit `config_override` must exist. Without one, a missing
/// project file means defaults. Environment overrides apply last, then the
/// result is validated.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<LaunchproofConfig> {
    let mut config = match config_override {
        Some(path) => load_config_file(path)?,
        None => {
            let path = config_path(project_root);
            if path.exists() {
                load_config_file(&path)?
            } else {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                LaunchproofConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

//! Settings validation.

use super::schema::LaunchproofConfig;
use crate::error::{LaunchproofError, Result};

/// Smallest byte cap that still captures a page's `<head>`.
const MIN_BYTE_CAP: usize = 1024;

/// Collect every problem with `config`.
pub fn validate_config(config: &LaunchproofConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, value) in [
        ("tier1_workers", config.tier1_workers),
        ("tier2_workers", config.tier2_workers),
        ("background_workers", config.background_workers),
        ("max_urls_per_run", config.max_urls_per_run),
    ] {
        if value == 0 {
            errors.push(format!("{} must be at least 1", name));
        }
    }
    if config.fetch.timeout_secs == 0 {
        errors.push("fetch.timeout_secs must be at least 1".to_string());
    }
    if config.fetch.byte_cap < MIN_BYTE_CAP {
        errors.push(format!("fetch.byte_cap must be at least {}", MIN_BYTE_CAP));
    }
    let email = &config.notifications.email;
    if email.to.is_some() && email.from.trim().is_empty() {
        errors.push("notifications.email.from is required when email.to is set".to_string());
    }
    if config.recovery.stale_after_minutes < 1 {
        errors.push("recovery.stale_after_minutes must be at least 1".to_string());
    }

    errors
}

/// Validate `config`, returning the first problems joined into one error.
pub fn validate(config: &LaunchproofConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LaunchproofError::ConfigValidationError {
            message: errors.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&LaunchproofConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = LaunchproofConfig::default();
        config.tier2_workers = 0;
        config.fetch.byte_cap = 10;
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("tier2_workers"));
        assert!(err.to_string().contains("byte_cap"));
    }

    #[test]
    fn email_recipient_needs_sender() {
        let mut config = LaunchproofConfig::default();
        config.notifications.email.to = Some("ops@example.com".into());
        config.notifications.email.from = " ".into();
        let errors = validate_config(&config);
        assert_eq!(errors, vec!["notifications.email.from is required when email.to is set"]);
    }
}

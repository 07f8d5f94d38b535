//! Settings and storage shared by commands that touch runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{load_config, LaunchproofConfig};
use crate::error::Result;
use crate::notify::{EmailNotifier, FanoutNotifier, LogNotifier, Notifier, SlackNotifier};
use crate::store::FileRunStore;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// A loaded project: its root and resolved settings.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: LaunchproofConfig,
}

impl Project {
    /// Load settings for the project at `root`.
    pub fn load(root: &Path, config_override: Option<&Path>) -> Result<Self> {
        let config = load_config(root, config_override)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LaunchproofConfig {
        &self.config
    }

    /// Directory holding run records. Relative paths hang off the root.
    pub fn store_dir(&self) -> PathBuf {
        self.root.join(&self.config.store_dir)
    }

    pub fn store(&self) -> FileRunStore {
        FileRunStore::new(self.store_dir())
    }

    /// Every configured channel (email, Slack), or the log when none is.
    pub fn notifier(&self) -> Result<Arc<dyn Notifier>> {
        let mut channels = self.notification_channels()?;
        Ok(match channels.len() {
            0 => Arc::new(LogNotifier),
            1 => channels.remove(0),
            _ => Arc::new(FanoutNotifier::new(channels)),
        })
    }

    fn notification_channels(&self) -> Result<Vec<Arc<dyn Notifier>>> {
        let notifications = &self.config.notifications;
        let mut channels: Vec<Arc<dyn Notifier>> = Vec::new();
        if let Some(email) = EmailNotifier::from_config(&notifications.email, NOTIFY_TIMEOUT)? {
            channels.push(Arc::new(email));
        }
        if let Some(url) = &notifications.slack_webhook_url {
            channels.push(Arc::new(SlackNotifier::new(url.clone(), NOTIFY_TIMEOUT)?));
        }
        Ok(channels)
    }
}

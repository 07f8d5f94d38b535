//! Settings loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading, and environment overrides in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use launchproof::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".launchproof")).unwrap();
//! fs::write(temp.path().join(".launchproof/config.yml"), "tier2_workers: 2").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.tier2_workers, 2);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    apply_env_overrides, config_path, find_project_root, load_config, load_config_file,
    parse_config, ENV_RESEND_API_KEY, ENV_SLACK_WEBHOOK, ENV_STORE_DIR, PROJECT_DIR,
};
pub use schema::{EmailConfig, FetchConfig, LaunchproofConfig, NotificationConfig, RecoveryConfig};
pub use validator::{validate, validate_config};

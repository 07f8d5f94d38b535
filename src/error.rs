//! Error types for launchproof operations.
//!
//! This module defines [`LaunchproofError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Rule bodies return `anyhow::Result`; the check wrapper turns failures
//!   into `error` outcomes so they never reach this type
//! - Use `LaunchproofError` for orchestration and collaborator failures that
//!   need distinct handling
//! - Use `anyhow::Error` (via `LaunchproofError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::lifecycle::RunStatus;

/// Core error type for launchproof operations.
#[derive(Debug, Error)]
pub enum LaunchproofError {
    /// Settings file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a settings or submission file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid settings values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Run submission rejected before a run was created.
    #[error("Invalid submission: {message}")]
    InvalidSubmission { message: String },

    /// Two checks registered under the same identifier.
    #[error("Duplicate check id: {id}")]
    DuplicateCheck { id: String },

    /// No run exists with the given identifier.
    #[error("Run not found: {id}")]
    RunNotFound { id: String },

    /// Lifecycle transition not permitted from the current status.
    #[error("Invalid run transition from {from} to {to}")]
    InvalidTransition { from: RunStatus, to: RunStatus },

    /// Persistence collaborator failure.
    #[error("Store error: {message}")]
    Store { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for launchproof operations.
pub type Result<T> = std::result::Result<T, LaunchproofError>;

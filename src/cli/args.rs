//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::context::Platform;

/// LaunchProof - pre-launch QA checks for ad campaigns.
#[derive(Debug, Parser)]
#[command(name = "launchproof")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .launchproof/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run all checks against a campaign submission
    Run(RunArgs),

    /// List registered checks
    Checks(ChecksArgs),

    /// Show the lifecycle status of a run
    Status(StatusArgs),

    /// Show the full report for a run
    Report(ReportArgs),

    /// Fail runs left running by a previous process
    Recover(RecoverArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Submission file (YAML or JSON)
    pub submission: PathBuf,

    /// User the run belongs to
    #[arg(short, long, default_value = "local", env = "LAUNCHPROOF_USER")]
    pub user: String,

    /// Print the partial summary and return once background checks are queued
    #[arg(long)]
    pub no_wait: bool,

    /// Emit JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `checks` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ChecksArgs {
    /// Only checks that apply to this platform
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Only checks in this tier (1 = compute, 2 = network)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub tier: Option<u8>,

    /// Emit JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StatusArgs {
    /// Run identifier
    pub run_id: String,

    /// Emit JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `report` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// Run identifier
    pub run_id: String,

    /// Emit JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `recover` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RecoverArgs {
    /// Override the configured staleness threshold, in minutes
    #[arg(long)]
    pub stale_after_minutes: Option<i64>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

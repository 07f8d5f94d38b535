//! Command-line interface for launchproof.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//! - [`output`] - Styled, capturable terminal output

pub mod args;
pub mod commands;
pub mod output;

pub use args::{
    ChecksArgs, Cli, Commands, CompletionsArgs, RecoverArgs, ReportArgs, RunArgs, StatusArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
pub use output::Output;

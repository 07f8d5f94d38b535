//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that touch runs load a
//! [`project::Project`] for settings and storage.

pub mod checks;
pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod project;
pub mod recover;
pub mod report;
pub mod run;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

//! Shell completions generation.
//!
//! The `launchproof completions` command generates shell completion scripts.

use clap::CommandFactory;
use std::io::Write;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::cli::output::Output;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Write the completion script for the configured shell.
    pub fn generate(&self, buf: &mut dyn Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "launchproof", buf);
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _out: &mut Output) -> crate::error::Result<CommandResult> {
        self.generate(&mut std::io::stdout());
        Ok(CommandResult::success())
    }
}

//! Checks command implementation.
//!
//! The `launchproof checks` command lists the registered checks.

use crate::checks::{CheckDefinition, CheckRegistry, Tier};
use crate::cli::args::ChecksArgs;
use crate::cli::output::Output;
use crate::error::{LaunchproofError, Result};

use super::dispatcher::{Command, CommandResult};

/// The checks command implementation.
pub struct ChecksCommand {
    args: ChecksArgs,
}

impl ChecksCommand {
    pub fn new(args: ChecksArgs) -> Self {
        Self { args }
    }

    fn definitions(&self, registry: &CheckRegistry) -> Result<Vec<CheckDefinition>> {
        let tier = self
            .args
            .tier
            .map(Tier::try_from)
            .transpose()
            .map_err(|message| LaunchproofError::ConfigValidationError { message })?;

        let mut definitions: Vec<CheckDefinition> = registry
            .all_definitions()
            .into_iter()
            .filter(|d| self.args.platform.is_none_or(|p| d.applies_to(p)))
            .filter(|d| tier.is_none_or(|t| d.tier == t))
            .collect();
        definitions.sort_by(|a, b| a.tier.cmp(&b.tier).then(a.check_id.cmp(&b.check_id)));
        Ok(definitions)
    }
}

impl Command for ChecksCommand {
    fn execute(&self, out: &mut Output) -> Result<CommandResult> {
        let registry = CheckRegistry::with_builtins()?;
        let definitions = self.definitions(&registry)?;

        if self.args.json {
            out.json(&definitions)?;
            return Ok(CommandResult::success());
        }

        out.header(&format!("{} checks", definitions.len()));
        for definition in &definitions {
            let platforms: Vec<&str> = definition.platforms.iter().map(|p| p.as_str()).collect();
            let line = format!(
                "  {:<32} tier {}  {:<8}  {:<10}  {}",
                definition.check_id,
                definition.tier,
                definition.severity,
                definition.category,
                out.theme().dim.apply_to(platforms.join(","))
            );
            out.line(&line);
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Platform;

    fn run(args: ChecksArgs) -> String {
        let mut out = Output::buffer();
        let result = ChecksCommand::new(args).execute(&mut out).unwrap();
        assert!(result.success);
        out.contents()
    }

    #[test]
    fn lists_every_builtin() {
        let text = run(ChecksArgs::default());
        let registry = CheckRegistry::with_builtins().unwrap();
        assert!(text.starts_with(&format!("{} checks", registry.len())));
        assert!(text.contains("url_reachable"));
        assert!(text.contains("headline_char_limit"));
    }

    #[test]
    fn tier_filter_keeps_only_network_checks() {
        let text = run(ChecksArgs {
            tier: Some(2),
            ..Default::default()
        });
        assert!(text.contains("url_reachable"));
        assert!(!text.contains("utm_source_present"));
    }

    #[test]
    fn json_lists_definitions() {
        let text = run(ChecksArgs {
            platform: Some(Platform::Meta),
            json: true,
            ..Default::default()
        });
        let parsed: Vec<CheckDefinition> = serde_json::from_str(&text).unwrap();
        assert!(!parsed.is_empty());
        assert!(parsed.iter().all(|d| d.applies_to(Platform::Meta)));
    }
}

//! Check registry.
//!
//! The [`CheckRegistry`] holds every check the process knows about. It is
//! built once at startup and read-only afterwards; share it behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use super::check::{Check, CheckDefinition, CheckId, Tier};
use super::rules;
use crate::context::Platform;
use crate::error::{LaunchproofError, Result};

/// Registry of available checks, keyed by id.
pub struct CheckRegistry {
    checks: HashMap<CheckId, Arc<dyn Check>>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Create a registry with every built-in check.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for check in rules::builtin_checks() {
            registry.register(check)?;
        }
        Ok(registry)
    }

    /// Register a check.
    ///
    /// A second check with an id that is already registered is rejected and
    /// the registry is left unchanged.
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<()> {
        let id = check.id();
        if self.checks.contains_key(&id) {
            return Err(LaunchproofError::DuplicateCheck { id: id.0 });
        }
        self.checks.insert(id, Arc::from(check));
        Ok(())
    }

    /// Get a check by ID.
    pub fn get(&self, id: &CheckId) -> Option<Arc<dyn Check>> {
        self.checks.get(id).cloned()
    }

    /// Checks that apply to `platform`, optionally limited to one tier.
    ///
    /// Order is unspecified.
    pub fn checks_for(&self, platform: Platform, tier: Option<Tier>) -> Vec<Arc<dyn Check>> {
        self.checks
            .values()
            .filter(|check| {
                let platforms = check.platforms();
                platforms.contains(&platform) || platforms.contains(&Platform::Universal)
            })
            .filter(|check| tier.is_none_or(|t| check.tier() == t))
            .cloned()
            .collect()
    }

    /// Metadata for every registered check, sorted by id.
    pub fn all_definitions(&self) -> Vec<CheckDefinition> {
        let mut definitions: Vec<CheckDefinition> =
            self.checks.values().map(|c| c.definition()).collect();
        definitions.sort_by(|a, b| a.check_id.cmp(&b.check_id));
        definitions
    }

    /// Get the number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

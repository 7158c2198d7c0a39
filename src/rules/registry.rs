//! Rule registry: the ordered, immutable set of active rule modules.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::rules::builtin;
use crate::rules::config::RuleConfig;
use crate::rules::module::{ActionResolver, PassThrough, RuleModule};

/// A rule config paired with the resolver that finishes its suggestions.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub config: RuleConfig,
    pub resolver: Arc<dyn ActionResolver>,
}

impl RuleDefinition {
    pub fn new(config: RuleConfig, resolver: Arc<dyn ActionResolver>) -> Self {
        Self { config, resolver }
    }

    /// Pair `config` with the pass-through resolver.
    pub fn passthrough(config: RuleConfig) -> Self {
        Self::new(config, Arc::new(PassThrough))
    }
}

/// Registered rule modules, in registration order.
///
/// Order matters: when two matching rules share a priority, the one
/// registered first wins.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    modules: Vec<RuleModule>,
}

impl RuleRegistry {
    /// Validate and compile `definitions`, keeping their order.
    ///
    /// Fails on the first unknown condition, mistyped parameter, or repeated
    /// rule name.
    pub fn build(definitions: Vec<RuleDefinition>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(definitions.len());
        let mut modules = Vec::with_capacity(definitions.len());

        for RuleDefinition { config, resolver } in definitions {
            if !seen.insert(config.name.clone()) {
                return Err(ConfigError::DuplicateRule { name: config.name });
            }
            let module = RuleModule::new(config, resolver)?;
            if module.conditions().is_empty() {
                warn!(
                    rule = %module.name(),
                    "Rule has no effective conditions and will never match"
                );
            }
            modules.push(module);
        }

        info!(rules = modules.len(), "Rule registry built");
        Ok(Self { modules })
    }

    /// Registry of the built-in rules.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::build(builtin::definitions()?)
    }

    /// Built-in rules followed by `extra` configs.
    ///
    /// Extra configs named after a built-in reuse its resolver; all others
    /// get the pass-through resolver.
    pub fn with_builtin_and(extra: Vec<RuleConfig>) -> Result<Self, ConfigError> {
        let mut definitions = builtin::definitions()?;
        definitions.extend(extra.into_iter().map(builtin::bind));
        Self::build(definitions)
    }

    /// Only `configs`, with built-in resolvers where names match.
    pub fn from_configs(configs: Vec<RuleConfig>) -> Result<Self, ConfigError> {
        Self::build(configs.into_iter().map(builtin::bind).collect())
    }

    pub fn modules(&self) -> &[RuleModule] {
        &self.modules
    }

    pub fn get(&self, name: &str) -> Option<&RuleModule> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(RuleModule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

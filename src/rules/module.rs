//! Rule modules: one config bound to its compiled conditions and resolver.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::rules::conditions::Condition;
use crate::rules::config::RuleConfig;
use crate::rules::types::{EvaluationContext, Suggestion};

/// Fills in the computed parts of a winning rule's suggestion.
///
/// Receives the suggestion built from the static template and returns the
/// final one. A field the resolver cannot compute should be left out rather
/// than defaulted.
pub trait ActionResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, suggestion: Suggestion, ctx: &EvaluationContext<'_>) -> Suggestion;
}

/// Returns the template-derived suggestion unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ActionResolver for PassThrough {
    fn resolve(&self, suggestion: Suggestion, _ctx: &EvaluationContext<'_>) -> Suggestion {
        suggestion
    }
}

/// A single pluggable rule.
#[derive(Debug, Clone)]
pub struct RuleModule {
    config: RuleConfig,
    conditions: Vec<Condition>,
    resolver: Arc<dyn ActionResolver>,
}

impl RuleModule {
    /// Compile `config`'s conditions and bind `resolver`.
    pub fn new(config: RuleConfig, resolver: Arc<dyn ActionResolver>) -> Result<Self, ConfigError> {
        let mut conditions = Vec::with_capacity(config.conditions.len());
        for (name, param) in &config.conditions {
            match Condition::compile(&config.name, name, param.as_ref())? {
                Some(condition) => conditions.push(condition),
                None => debug!(
                    rule = %config.name,
                    condition = %name,
                    "Condition has no constraint, skipping"
                ),
            }
        }
        Ok(Self {
            config,
            conditions,
            resolver,
        })
    }

    /// Module with the pass-through resolver.
    pub fn with_default_resolver(config: RuleConfig) -> Result<Self, ConfigError> {
        Self::new(config, Arc::new(PassThrough))
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn priority(&self) -> i32 {
        self.config.priority
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Confidence reported for this rule: priority scaled into `[0, 1]`.
    pub fn confidence(&self) -> f32 {
        self.config.priority.clamp(0, 100) as f32 / 100.0
    }

    /// True iff every configured condition holds.
    ///
    /// A module without conditions never matches.
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(|c| c.evaluate(ctx))
    }

    /// Build this rule's suggestion for `ctx`.
    pub fn build_action(&self, ctx: &EvaluationContext<'_>) -> Suggestion {
        let action = &self.config.action;

        let due = action.due_date.as_ref().and_then(|spec| {
            let resolved = spec.resolve(ctx);
            if resolved.is_none() {
                debug!(
                    rule = %self.config.name,
                    spec = ?spec,
                    "Due date could not be resolved, omitting"
                );
            }
            resolved
        });

        let project = action
            .project
            .clone()
            .or_else(|| ctx.tokens().projects.first().cloned());

        let mut suggestion = Suggestion::from_rule(&self.config.name)
            .with_category(action.category)
            .with_priority(action.priority)
            .with_due_date(due)
            .with_tags(action.tags.clone())
            .with_project(project)
            .with_reason(action.reason.clone())
            .with_confidence(self.confidence());
        for tag in &ctx.tokens().tags {
            suggestion = suggestion.with_tag(tag.clone());
        }

        self.resolver.resolve(suggestion, ctx)
    }
}

//! Built-in rule modules.
//!
//! The configs live in `builtin_rules.json` (same format users write); the
//! resolvers below supply the fields a static template cannot express.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::ConfigError;
use crate::rules::conditions;
use crate::rules::config::{RuleConfig, load_rules};
use crate::rules::module::{ActionResolver, PassThrough};
use crate::rules::registry::RuleDefinition;
use crate::rules::types::{Category, EvaluationContext, Suggestion};

pub const URGENT_HIGH_PRIORITY: &str = "urgent-high-priority";
pub const TODAY_TOMORROW_TASKS: &str = "today-tomorrow-tasks";
pub const DEADLINE_DETECTION: &str = "deadline-detection";
pub const CODE_SNIPPET_NOTE: &str = "code-snippet-note";
pub const URL_BOOKMARK_NOTE: &str = "url-bookmark-note";

const BUILTIN_RULES_JSON: &str = include_str!("builtin_rules.json");

// Info string of a fence, anchored at the fence itself.
static FENCE_LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:```|~~~)([A-Za-z][A-Za-z0-9_+#-]*)[ \t]*\r?\n")
        .expect("fence language pattern is valid")
});

/// Built-in configs in registration order.
pub fn configs() -> Result<Vec<RuleConfig>, ConfigError> {
    load_rules(BUILTIN_RULES_JSON)
}

/// Built-in configs bound to their resolvers.
pub fn definitions() -> Result<Vec<RuleDefinition>, ConfigError> {
    Ok(configs()?.into_iter().map(bind).collect())
}

/// Pair a config with the built-in resolver of the same name, if any.
pub fn bind(config: RuleConfig) -> RuleDefinition {
    let resolver = resolver_for(&config.name);
    RuleDefinition::new(config, resolver)
}

/// Resolver registered for `rule_name`; pass-through for unknown names.
pub fn resolver_for(rule_name: &str) -> Arc<dyn ActionResolver> {
    match rule_name {
        CODE_SNIPPET_NOTE => Arc::new(CodeLanguageTagger),
        URL_BOOKMARK_NOTE => Arc::new(ProjectBookmark),
        _ => Arc::new(PassThrough),
    }
}

/// Tags a code note with the language named on its first closed fence.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeLanguageTagger;

impl ActionResolver for CodeLanguageTagger {
    fn resolve(&self, suggestion: Suggestion, ctx: &EvaluationContext<'_>) -> Suggestion {
        let language = conditions::code_fences(ctx.content())
            .find_map(|fence| FENCE_LANGUAGE_RE.captures(fence))
            .map(|caps| caps[1].to_lowercase());
        match language {
            Some(language) => suggestion.with_tag(language),
            None => suggestion,
        }
    }
}

/// Files a link under its project when the item already has one.
///
/// Without a project the link stays a bookmark. With one it becomes a note
/// attached to that project.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectBookmark;

impl ActionResolver for ProjectBookmark {
    fn resolve(&self, suggestion: Suggestion, ctx: &EvaluationContext<'_>) -> Suggestion {
        if ctx.has_project() != Some(true) {
            return suggestion;
        }
        let project = suggestion
            .suggested_project()
            .or(ctx.project_name())
            .map(str::to_string);
        suggestion
            .with_category(Some(Category::Note))
            .with_reason(Some("url_with_project".into()))
            .with_project(project)
    }
}

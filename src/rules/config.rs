//! Declarative rule definitions.
//!
//! A rules document is a JSON array of [`RuleConfig`] records:
//!
//! ```json
//! [{
//!   "name": "urgent-high-priority",
//!   "priority": 100,
//!   "conditions": { "contains_keywords": ["urgent", "asap"] },
//!   "action": { "category": "task", "priority": "high", "dueDate": { "type": "today" } }
//! }]
//! ```
//!
//! Condition names stay plain strings here so a document survives a
//! load/save cycle untouched; they are checked when the registry is built.
//! Unknown record or action keys are rejected at load time.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Days, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::rules::conditions::ConditionParam;
use crate::rules::dates;
use crate::rules::types::{Category, EvaluationContext, Priority};

/// One rule as written in a rules document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    /// Unique rule name, reported back as `ruleName`.
    pub name: String,
    /// Higher wins when several rules match.
    pub priority: i32,
    /// Condition name → parameter. A `null` parameter means "no constraint".
    #[serde(default, alias = "triggerConditions")]
    pub conditions: BTreeMap<String, Option<ConditionParam>>,
    /// What to suggest when the rule wins.
    #[serde(default)]
    pub action: ActionTemplate,
}

impl RuleConfig {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            conditions: BTreeMap::new(),
            action: ActionTemplate::default(),
        }
    }

    /// Builder: add a condition.
    pub fn with_condition(mut self, name: impl Into<String>, param: ConditionParam) -> Self {
        self.conditions.insert(name.into(), Some(param));
        self
    }

    /// Builder: set the action template.
    pub fn with_action(mut self, action: ActionTemplate) -> Self {
        self.action = action;
        self
    }
}

/// Static part of a rule's suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDateSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// How a rule's due date is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DueDateSpec {
    /// The evaluation date.
    Today,
    /// The day after the evaluation date.
    Tomorrow,
    /// Whatever [`dates::extract_due_date`] finds in the content.
    Extracted,
    /// A fixed date.
    Literal { date: NaiveDate },
    /// `days` after the evaluation date (may be negative).
    Relative { days: i64 },
}

impl DueDateSpec {
    /// Resolve against the evaluation date. `None` when nothing resolves.
    pub fn resolve(&self, ctx: &EvaluationContext<'_>) -> Option<NaiveDate> {
        let today = ctx.today();
        match self {
            Self::Today => Some(today),
            Self::Tomorrow => today.checked_add_days(Days::new(1)),
            Self::Extracted => dates::extract_due_date(ctx.content(), today),
            Self::Literal { date } => Some(*date),
            Self::Relative { days } => {
                TimeDelta::try_days(*days).and_then(|delta| today.checked_add_signed(delta))
            }
        }
    }
}

/// Parse a rules document.
pub fn load_rules(json: &str) -> Result<Vec<RuleConfig>, ConfigError> {
    let rules: Vec<RuleConfig> = serde_json::from_str(json)
        .map_err(|e| ConfigError::ParseError(format!("rules document: {e}")))?;
    debug!(count = rules.len(), "Loaded rule definitions");
    Ok(rules)
}

/// Read and parse a rules document from disk.
pub fn load_rules_file(path: &Path) -> Result<Vec<RuleConfig>, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    load_rules(&json).map_err(|e| match e {
        ConfigError::ParseError(msg) => {
            ConfigError::ParseError(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Serialize rules back into a document.
pub fn rules_to_json(rules: &[RuleConfig]) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(rules)
        .map_err(|e| ConfigError::ParseError(format!("serializing rules: {e}")))
}

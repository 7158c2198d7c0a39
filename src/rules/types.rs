//! Shared types for inbox rule evaluation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::inbox::parse::ParsedTokens;

// ── Categories ──────────────────────────────────────────────────────

/// What an inbox item should become once triaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Task,
    Note,
    Bookmark,
}

impl Category {
    /// Wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
            Self::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Suggested task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

// ── Auxiliary context ───────────────────────────────────────────────

/// Caller-supplied lookups that conditions may need.
///
/// Every field is optional: `None` means the caller did not look it up,
/// which is different from a negative answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxContext {
    /// Whether the item already belongs to one of the user's projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_associated_project: Option<bool>,
    /// Name of that project, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl AuxContext {
    /// Context for an item known to belong to `name`.
    pub fn with_project(name: impl Into<String>) -> Self {
        Self {
            has_associated_project: Some(true),
            project_name: Some(name.into()),
        }
    }

    /// Context for an item known to have no project.
    pub fn without_project() -> Self {
        Self {
            has_associated_project: Some(false),
            project_name: None,
        }
    }
}

// ── Evaluation context ──────────────────────────────────────────────

/// Everything a single evaluation looks at.
///
/// Built once per call; `today` is read from the clock exactly once so every
/// rule in the evaluation sees the same date.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    content: &'a str,
    lowered: String,
    tokens: ParsedTokens,
    aux: &'a AuxContext,
    today: NaiveDate,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(content: &'a str, aux: &'a AuxContext, today: NaiveDate) -> Self {
        Self {
            content,
            lowered: content.to_lowercase(),
            tokens: ParsedTokens::parse(content),
            aux,
            today,
        }
    }

    /// Raw inbox content.
    pub fn content(&self) -> &str {
        self.content
    }

    /// Lowercased content.
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Inline `#tag` / `+project` tokens found in the content.
    pub fn tokens(&self) -> &ParsedTokens {
        &self.tokens
    }

    pub fn aux(&self) -> &AuxContext {
        self.aux
    }

    /// Evaluation date.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Whether the item is tied to a project.
    ///
    /// A `+project` token in the content answers `true` on its own. Otherwise
    /// the caller's lookup decides; `None` means nobody knows.
    pub fn has_project(&self) -> Option<bool> {
        if !self.tokens.projects.is_empty() {
            return Some(true);
        }
        self.aux.has_associated_project
    }

    /// Project the item is tied to, content tokens first.
    pub fn project_name(&self) -> Option<&str> {
        self.tokens
            .projects
            .first()
            .map(String::as_str)
            .or(self.aux.project_name.as_deref())
    }
}

// ── Suggestion ──────────────────────────────────────────────────────

/// Engine output: how to categorize and act on one inbox item.
///
/// A suggestion is never edited in place. The `with_*` methods consume it and
/// return a new value, which is how action resolvers and callers override
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(default)]
    rule_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggested_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Suggestion {
    /// The "no rule matched" outcome.
    pub fn none() -> Self {
        Self::default()
    }

    /// Start a suggestion attributed to `rule_name`.
    pub fn from_rule(rule_name: impl Into<String>) -> Self {
        Self {
            rule_name: Some(rule_name.into()),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_due_date(mut self, due: Option<NaiveDate>) -> Self {
        self.suggested_due_date = due;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.suggested_tags = tags;
        self
    }

    /// Append a tag unless it is already present (case-insensitive).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self
            .suggested_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&tag))
        {
            self.suggested_tags.push(tag);
        }
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.suggested_project = project;
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Name of the winning rule, `None` when nothing matched.
    pub fn rule_name(&self) -> Option<&str> {
        self.rule_name.as_deref()
    }

    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }

    pub fn suggested_due_date(&self) -> Option<NaiveDate> {
        self.suggested_due_date
    }

    pub fn suggested_tags(&self) -> &[String] {
        &self.suggested_tags
    }

    pub fn suggested_project(&self) -> Option<&str> {
        self.suggested_project.as_deref()
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Whether any rule matched.
    pub fn is_match(&self) -> bool {
        self.rule_name.is_some()
    }
}

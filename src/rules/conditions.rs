//! Condition library: pure predicates over inbox content.
//!
//! Rule configs name conditions by string. Those names resolve to
//! [`ConditionKind`] while the registry is built, and each parameter is
//! type-checked and compiled into a [`Condition`]. Anything unknown or
//! mistyped fails the build, so evaluation never meets an unknown condition.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::rules::dates;
use crate::rules::types::EvaluationContext;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).expect("url pattern is valid")
});

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:```.*?```|~~~.*?~~~)").expect("fence pattern is valid")
});

/// Imperative verbs that usually open a task ("call the bank").
const ACTION_VERBS: &[&str] = &[
    "add", "answer", "arrange", "ask", "attend", "backup", "book", "bring",
    "build", "buy", "call", "cancel", "change", "charge", "check", "choose", "clean",
    "collect", "complete", "confirm", "contact", "cook", "create", "deliver", "deploy",
    "design", "discuss", "do", "download", "draft", "drive", "drop", "edit", "email",
    "feed", "fetch", "file", "fill", "find", "finish", "fix", "follow", "get", "give", "go",
    "grab", "help", "hire", "install", "invite", "join", "learn", "look", "mail", "make",
    "meet", "message", "move", "order", "organize", "pack", "pay", "pick", "pickup", "plan",
    "post", "practice", "prepare", "print", "read", "refactor", "register", "remember",
    "remind", "renew", "repair", "replace", "reply", "request", "research", "reserve",
    "return", "review", "schedule", "sell", "send", "set", "setup", "share", "ship", "sign",
    "sort", "start", "study", "submit", "take", "talk", "tell", "test", "text", "try",
    "update", "upload", "visit", "walk", "wash", "watch", "water", "write",
];

// ── Condition kinds ─────────────────────────────────────────────────

/// Every condition the library knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    ContainsKeywords,
    StartsWithVerb,
    ContainsCode,
    ContainsUrl,
    HasProject,
    MentionsDate,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 6] = [
        Self::ContainsKeywords,
        Self::StartsWithVerb,
        Self::ContainsCode,
        Self::ContainsUrl,
        Self::HasProject,
        Self::MentionsDate,
    ];

    /// Name used in rule configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContainsKeywords => "contains_keywords",
            Self::StartsWithVerb => "starts_with_verb",
            Self::ContainsCode => "contains_code",
            Self::ContainsUrl => "contains_url",
            Self::HasProject => "has_project",
            Self::MentionsDate => "mentions_date",
        }
    }

    fn expected_param(&self) -> &'static str {
        match self {
            Self::ContainsKeywords => "a list of keywords",
            _ => "a boolean",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// ── Parameters ──────────────────────────────────────────────────────

/// Declarative parameter attached to a condition name in a rule config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionParam {
    /// Expected outcome of a boolean predicate (`false` negates it).
    Flag(bool),
    /// Keywords for `contains_keywords`.
    Keywords(Vec<String>),
}

// ── Compiled conditions ─────────────────────────────────────────────

/// A validated, ready-to-run condition.
#[derive(Debug, Clone)]
pub enum Condition {
    ContainsKeywords(KeywordMatcher),
    StartsWithVerb(bool),
    ContainsCode(bool),
    ContainsUrl(bool),
    HasProject(bool),
    MentionsDate(bool),
}

impl Condition {
    /// Resolve one `name: param` entry of `rule`'s config.
    ///
    /// Returns `Ok(None)` when the entry carries no constraint (`null` or an
    /// empty keyword list) and should be skipped.
    pub fn compile(
        rule: &str,
        name: &str,
        param: Option<&ConditionParam>,
    ) -> Result<Option<Self>, ConfigError> {
        let kind = ConditionKind::from_str(name).map_err(|condition| {
            ConfigError::UnknownCondition {
                rule: rule.to_string(),
                condition,
            }
        })?;

        let Some(param) = param else {
            return Ok(None);
        };

        let invalid = || ConfigError::InvalidParameter {
            rule: rule.to_string(),
            condition: kind.to_string(),
            expected: kind.expected_param().to_string(),
        };

        let condition = match (kind, param) {
            (ConditionKind::ContainsKeywords, ConditionParam::Keywords(keywords)) => {
                match KeywordMatcher::new(keywords).map_err(|_| invalid())? {
                    Some(matcher) => Self::ContainsKeywords(matcher),
                    None => return Ok(None),
                }
            }
            (ConditionKind::StartsWithVerb, ConditionParam::Flag(v)) => Self::StartsWithVerb(*v),
            (ConditionKind::ContainsCode, ConditionParam::Flag(v)) => Self::ContainsCode(*v),
            (ConditionKind::ContainsUrl, ConditionParam::Flag(v)) => Self::ContainsUrl(*v),
            (ConditionKind::HasProject, ConditionParam::Flag(v)) => Self::HasProject(*v),
            (ConditionKind::MentionsDate, ConditionParam::Flag(v)) => Self::MentionsDate(*v),
            _ => return Err(invalid()),
        };
        Ok(Some(condition))
    }

    /// Run the predicate against `ctx`.
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> bool {
        match self {
            Self::ContainsKeywords(matcher) => contains_keywords(matcher, ctx),
            Self::StartsWithVerb(expected) => starts_with_verb(*expected, ctx),
            Self::ContainsCode(expected) => contains_code(ctx.content()) == *expected,
            Self::ContainsUrl(expected) => contains_url(ctx.content()) == *expected,
            Self::HasProject(expected) => has_project(*expected, ctx),
            Self::MentionsDate(expected) => dates::mentions_date(ctx.content()) == *expected,
        }
    }
}

/// Case-insensitive whole-word matcher over a keyword list.
///
/// A keyword edge that is a word character must sit on a word boundary.
/// A punctuation edge (`#urgent`, `c++`) must meet whitespace, other
/// punctuation, or the end of the text.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
}

impl KeywordMatcher {
    /// Build a matcher, or `None` if the list holds no usable keyword.
    pub fn new(keywords: &[String]) -> Result<Option<Self>, regex::Error> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(keyword_pattern)
            .collect();
        if alternatives.is_empty() {
            return Ok(None);
        }
        let pattern = format!("(?i)(?:{})", alternatives.join("|"));
        Ok(Some(Self {
            regex: Regex::new(&pattern)?,
        }))
    }

    pub fn is_match(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }
}

// ── Predicates ──────────────────────────────────────────────────────

/// Any keyword appears as a whole word, ignoring case.
pub fn contains_keywords(matcher: &KeywordMatcher, ctx: &EvaluationContext<'_>) -> bool {
    matcher.is_match(ctx.content())
}

/// The first token is a known imperative verb, compared with `expected`.
pub fn starts_with_verb(expected: bool, ctx: &EvaluationContext<'_>) -> bool {
    first_word_is_verb(ctx.lowered()) == expected
}

/// The item is tied to a project, compared with `expected`.
///
/// Fails closed: when neither the content nor the caller can say whether a
/// project exists, the condition is not satisfied whatever `expected` is.
pub fn has_project(expected: bool, ctx: &EvaluationContext<'_>) -> bool {
    match ctx.has_project() {
        Some(actual) => actual == expected,
        None => {
            warn!(
                condition = %ConditionKind::HasProject,
                "Auxiliary context lacks hasAssociatedProject, treating condition as unsatisfied"
            );
            false
        }
    }
}

/// Fenced code block, or two or more consecutive indented lines.
pub fn contains_code(content: &str) -> bool {
    if FENCE_RE.is_match(content) {
        return true;
    }
    let mut run = 0;
    for line in content.lines() {
        let indented = (line.starts_with('\t') || line.starts_with("    ")) && !line.trim().is_empty();
        if indented {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Closed fenced code blocks in `content`, fences included.
pub fn code_fences(content: &str) -> impl Iterator<Item = &str> {
    FENCE_RE.find_iter(content).map(|m| m.as_str())
}

/// An `http(s)://` or `www.` URL appears anywhere.
pub fn contains_url(content: &str) -> bool {
    URL_RE.is_match(content)
}

fn keyword_pattern(keyword: &str) -> String {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let leading = match keyword.chars().next() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:^|\W)",
    };
    let trailing = match keyword.chars().last() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:\W|$)",
    };
    format!("{leading}{body}{trailing}")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn first_word_is_verb(lowered: &str) -> bool {
    lowered
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .is_some_and(|word| ACTION_VERBS.contains(&word))
}

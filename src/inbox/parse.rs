//! Inline token syntax for inbox content.
//!
//! Users tag items while typing: `#errand` adds a tag, `+Home` or
//! `+"Side Project"` names a project. Tokens only count at the start of the
//! text or after whitespace, so URL fragments and `c++` stay untouched.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#([\p{L}\p{N}_-]+)").expect("tag pattern is valid")
});

static PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)\+(?:"([^"]+)"|([\p{L}\p{N}_-]+))"#).expect("project pattern is valid")
});

/// Tokens pulled out of one piece of inbox content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTokens {
    /// `#tag` names in order of appearance, without duplicates.
    pub tags: Vec<String>,
    /// `+project` names in order of appearance, without duplicates.
    pub projects: Vec<String>,
}

impl ParsedTokens {
    pub fn parse(content: &str) -> Self {
        let mut tags = Vec::new();
        for caps in TAG_RE.captures_iter(content) {
            push_unique(&mut tags, &caps[1]);
        }

        let mut projects = Vec::new();
        for caps in PROJECT_RE.captures_iter(content) {
            if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
                let name = name.as_str().trim();
                if !name.is_empty() {
                    push_unique(&mut projects, name);
                }
            }
        }

        Self { tags, projects }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.projects.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        list.push(value.to_string());
    }
}

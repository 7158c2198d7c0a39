//! Inbox processing service: the entry point for callers.
//!
//! Controllers hand items in and get suggestions back. Nothing here
//! persists anything; accepting a suggestion and marking the item
//! processed is the caller's business.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use tracing::{debug, info};

use crate::config::InboxConfig;
use crate::error::{self, ConfigError};
use crate::inbox::model::{InboxItem, InboxSource};
use crate::rules::config::load_rules_file;
use crate::rules::engine::Evaluator;
use crate::rules::registry::RuleRegistry;
use crate::rules::types::{AuxContext, Suggestion};

/// Stateless inbox classifier. Share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InboxProcessingService {
    evaluator: Evaluator,
    offset: FixedOffset,
}

impl InboxProcessingService {
    /// Service over `registry`, taking "today" at `offset` from UTC.
    pub fn new(registry: RuleRegistry, offset: FixedOffset) -> Self {
        Self {
            evaluator: Evaluator::new(registry),
            offset,
        }
    }

    /// Built-in rules, dates in UTC.
    pub fn with_builtin_rules() -> Result<Self, ConfigError> {
        Ok(Self::new(RuleRegistry::builtin()?, utc()))
    }

    /// Assemble the registry described by `config`.
    pub fn from_config(config: &InboxConfig) -> Result<Self, ConfigError> {
        let offset = config.utc_offset()?;
        let extra = match &config.rules_path {
            Some(path) => {
                let rules = load_rules_file(path)?;
                info!(path = %path.display(), count = rules.len(), "Loaded rules file");
                rules
            }
            None => Vec::new(),
        };
        let registry = if config.include_builtin_rules {
            RuleRegistry::with_builtin_and(extra)?
        } else {
            RuleRegistry::from_configs(extra)?
        };
        Ok(Self::new(registry, offset))
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Current date at the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Capture `content` as a new item and classify it.
    pub fn capture(
        &self,
        content: &str,
        source: InboxSource,
        aux: &AuxContext,
    ) -> error::Result<(InboxItem, Suggestion)> {
        let item = InboxItem::new(content, source)?;
        let suggestion = self.classify(&item, aux);
        Ok((item, suggestion))
    }

    /// Classify a stored inbox item.
    pub fn classify(&self, item: &InboxItem, aux: &AuxContext) -> Suggestion {
        if !item.is_pending() {
            debug!(
                id = %item.id,
                status = %item.status,
                "Classifying an item that is no longer pending"
            );
        }
        let suggestion = self.classify_content(&item.content, aux);
        info!(
            id = %item.id,
            source = ?item.source,
            rule = suggestion.rule_name().unwrap_or("none"),
            category = suggestion.category().map(|c| c.label()).unwrap_or("none"),
            "Classified inbox item"
        );
        suggestion
    }

    /// Classify raw content as of today.
    pub fn classify_content(&self, content: &str, aux: &AuxContext) -> Suggestion {
        self.classify_at(content, aux, self.today())
    }

    /// Classify raw content as of `today`.
    pub fn classify_at(&self, content: &str, aux: &AuxContext, today: NaiveDate) -> Suggestion {
        debug!(%today, len = content.len(), "Evaluating inbox content");
        self.evaluator.evaluate(content, aux, today)
    }

    /// Whether `content` holds a code block.
    pub fn contains_code(&self, content: &str) -> bool {
        Evaluator::contains_code(content)
    }

    /// Whether `content` holds a URL.
    pub fn contains_url(&self, content: &str) -> bool {
        Evaluator::contains_url(content)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, InboxError};
    use crate::rules::types::{Category, Priority};

    // 2024-06-10 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> InboxProcessingService {
        InboxProcessingService::with_builtin_rules().unwrap()
    }

    #[test]
    fn urgent_item_is_due_today() {
        let s = service().classify_at("URGENT: call the bank", &AuxContext::default(), monday());
        assert_eq!(s.rule_name(), Some("urgent-high-priority"));
        assert_eq!(s.category(), Some(Category::Task));
        assert_eq!(s.priority(), Some(Priority::High));
        assert_eq!(s.suggested_due_date(), Some(monday()));
        assert_eq!(s.confidence(), Some(1.0));
    }

    #[test]
    fn urgent_outranks_a_dated_task() {
        let svc = service();
        let aux = AuxContext::default();
        assert_eq!(
            svc.evaluator().matching_rules("URGENT buy milk tomorrow", &aux, monday()),
            vec!["urgent-high-priority", "deadline-detection"]
        );
        let s = svc.classify_at("URGENT buy milk tomorrow", &aux, monday());
        assert_eq!(s.rule_name(), Some("urgent-high-priority"));
        assert_eq!(s.suggested_due_date(), Some(monday()));

        assert_eq!(
            svc.evaluator().matching_rules("buy milk tomorrow, urgent", &aux, monday()),
            vec!["urgent-high-priority", "today-tomorrow-tasks", "deadline-detection"]
        );
        let s = svc.classify_at("buy milk tomorrow, urgent", &aux, monday());
        assert_eq!(s.rule_name(), Some("urgent-high-priority"));
        assert_eq!(s.priority(), Some(Priority::High));
        assert_eq!(s.suggested_due_date(), Some(monday()));
    }

    #[test]
    fn verb_plus_tomorrow_is_task_due_tomorrow() {
        let s = service().classify_at("Buy milk tomorrow", &AuxContext::default(), monday());
        assert_eq!(s.rule_name(), Some("today-tomorrow-tasks"));
        assert_eq!(s.category(), Some(Category::Task));
        assert_eq!(s.suggested_due_date(), Some(date(2024, 6, 11)));
    }

    #[test]
    fn by_friday_resolves_within_the_week() {
        let s = service().classify_at("By Friday finish report", &AuxContext::default(), monday());
        assert_eq!(s.rule_name(), Some("deadline-detection"));
        assert_eq!(s.suggested_due_date(), Some(date(2024, 6, 14)));
    }

    #[test]
    fn deadline_without_date_drops_due_date() {
        let s = service().classify_at("deadline for the grant", &AuxContext::default(), monday());
        assert_eq!(s.rule_name(), Some("deadline-detection"));
        assert_eq!(s.category(), Some(Category::Task));
        assert_eq!(s.suggested_due_date(), None);
    }

    #[test]
    fn code_block_becomes_note() {
        let content = "handy:\n```sh\ngit log --oneline\n```";
        let s = service().classify_at(content, &AuxContext::default(), monday());
        assert_eq!(s.rule_name(), Some("code-snippet-note"));
        assert_eq!(s.category(), Some(Category::Note));
        assert_eq!(s.suggested_due_date(), None);
        assert_eq!(s.suggested_tags(), &["code", "sh"]);
    }

    #[test]
    fn url_becomes_bookmark() {
        let s = service().classify_at(
            "https://doc.rust-lang.org/book/",
            &AuxContext::default(),
            monday(),
        );
        assert_eq!(s.rule_name(), Some("url-bookmark-note"));
        assert_eq!(s.category(), Some(Category::Bookmark));
    }

    #[test]
    fn url_inside_code_is_a_code_note() {
        let content = "```\ncurl https://example.com\n```";
        let s = service().classify_at(content, &AuxContext::default(), monday());
        assert_eq!(s.rule_name(), Some("code-snippet-note"));
    }

    #[test]
    fn unrelated_and_empty_content_match_nothing() {
        let svc = service();
        for content in ["", "   ", "a thought about clouds"] {
            let s = svc.classify_at(content, &AuxContext::default(), monday());
            assert_eq!(s, Suggestion::none(), "content {:?}", content);
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let svc = service();
        let aux = AuxContext::with_project("Errands");
        let a = svc.classify_at("Buy milk today #shopping", &aux, monday());
        let b = svc.classify_at("Buy milk today #shopping", &aux, monday());
        assert_eq!(a, b);
        assert_eq!(a.suggested_tags(), &["shopping"]);
    }

    #[test]
    fn classify_uses_item_content() {
        let item = InboxItem::new("asap: renew passport", InboxSource::Telegram).unwrap();
        let svc = service();
        let s = svc.classify(&item, &AuxContext::default());
        assert_eq!(s.rule_name(), Some("urgent-high-priority"));
        assert_eq!(s.suggested_due_date(), Some(svc.today()));
    }

    #[test]
    fn capture_creates_and_classifies() {
        let svc = service();
        let (item, s) = svc
            .capture("https://news.ycombinator.com", InboxSource::Api, &AuxContext::default())
            .unwrap();
        assert!(item.is_pending());
        assert_eq!(item.source, InboxSource::Api);
        assert_eq!(s.rule_name(), Some("url-bookmark-note"));
    }

    #[test]
    fn capture_rejects_blank_content() {
        let err = service()
            .capture("  ", InboxSource::Manual, &AuxContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::Inbox(InboxError::EmptyContent)));
    }

    #[test]
    fn content_helpers() {
        let svc = service();
        assert!(svc.contains_code("```\nx\n```"));
        assert!(svc.contains_url("www.example.com"));
        assert!(!svc.contains_code("no code"));
    }

    #[test]
    fn config_without_builtins_and_no_file_matches_nothing() {
        let config = InboxConfig {
            include_builtin_rules: false,
            ..InboxConfig::default()
        };
        let svc = InboxProcessingService::from_config(&config).unwrap();
        assert!(svc.evaluator().registry().is_empty());
        assert!(!svc.classify_content("URGENT", &AuxContext::default()).is_match());
    }
}

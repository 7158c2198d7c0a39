//! Evaluation engine: runs the registry against one inbox item.

use chrono::NaiveDate;
use tracing::debug;

use crate::rules::conditions;
use crate::rules::module::RuleModule;
use crate::rules::registry::RuleRegistry;
use crate::rules::types::{AuxContext, EvaluationContext, Suggestion};

/// Evaluates inbox content against a fixed rule registry.
///
/// Holds no mutable state; one evaluator can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: RuleRegistry,
}

impl Evaluator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Classify `content` as of `today`.
    ///
    /// Returns [`Suggestion::none`] when no rule matches.
    pub fn evaluate(&self, content: &str, aux: &AuxContext, today: NaiveDate) -> Suggestion {
        let ctx = EvaluationContext::new(content, aux, today);
        match self.select(&ctx) {
            Some(winner) => {
                debug!(
                    rule = %winner.name(),
                    priority = winner.priority(),
                    "Rule selected"
                );
                winner.build_action(&ctx)
            }
            None => {
                debug!("No rule matched");
                Suggestion::none()
            }
        }
    }

    /// Names of every matching rule, in registration order.
    pub fn matching_rules(&self, content: &str, aux: &AuxContext, today: NaiveDate) -> Vec<&str> {
        let ctx = EvaluationContext::new(content, aux, today);
        self.registry
            .modules()
            .iter()
            .filter(|m| m.evaluate(&ctx))
            .map(RuleModule::name)
            .collect()
    }

    /// Highest priority match; the earliest registered wins a tie.
    fn select(&self, ctx: &EvaluationContext<'_>) -> Option<&RuleModule> {
        let mut best: Option<&RuleModule> = None;
        for module in self.registry.modules() {
            if !module.evaluate(ctx) {
                continue;
            }
            debug!(rule = %module.name(), priority = module.priority(), "Rule matched");
            if best.is_none_or(|b| module.priority() > b.priority()) {
                best = Some(module);
            }
        }
        best
    }

    /// Rule-independent check for code blocks.
    pub fn contains_code(content: &str) -> bool {
        conditions::contains_code(content)
    }

    /// Rule-independent check for URLs.
    pub fn contains_url(content: &str) -> bool {
        conditions::contains_url(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rules::conditions::ConditionParam;
    use crate::rules::config::{ActionTemplate, RuleConfig};
    use crate::rules::registry::RuleDefinition;
    use crate::rules::types::Category;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn keyword_rule(name: &str, priority: i32, keyword: &str, category: Category) -> RuleDefinition {
        RuleDefinition::passthrough(
            RuleConfig::new(name, priority)
                .with_condition(
                    "contains_keywords",
                    ConditionParam::Keywords(vec![keyword.to_string()]),
                )
                .with_action(ActionTemplate {
                    category: Some(category),
                    ..ActionTemplate::default()
                }),
        )
    }

    fn evaluator(definitions: Vec<RuleDefinition>) -> Evaluator {
        Evaluator::new(RuleRegistry::build(definitions).unwrap())
    }

    #[test]
    fn highest_priority_wins() {
        let engine = evaluator(vec![
            keyword_rule("low", 10, "milk", Category::Note),
            keyword_rule("high", 20, "milk", Category::Task),
        ]);
        let suggestion = engine.evaluate("milk", &AuxContext::default(), monday());
        assert_eq!(suggestion.rule_name(), Some("high"));
        assert_eq!(suggestion.category(), Some(Category::Task));
    }

    #[test]
    fn ties_go_to_first_registered() {
        let engine = evaluator(vec![
            keyword_rule("first", 10, "milk", Category::Note),
            keyword_rule("second", 10, "milk", Category::Task),
        ]);
        let aux = AuxContext::default();
        let a = engine.evaluate("milk", &aux, monday());
        let b = engine.evaluate("milk", &aux, monday());
        assert_eq!(a.rule_name(), Some("first"));
        assert_eq!(a, b);
    }

    #[test]
    fn tie_winner_follows_registration_not_name() {
        let engine = evaluator(vec![
            keyword_rule("zeta", 10, "milk", Category::Note),
            keyword_rule("alpha", 10, "milk", Category::Task),
        ]);
        let suggestion = engine.evaluate("milk", &AuxContext::default(), monday());
        assert_eq!(suggestion.rule_name(), Some("zeta"));
    }

    #[test]
    fn no_match_is_empty_suggestion() {
        let engine = evaluator(vec![keyword_rule("milk", 10, "milk", Category::Task)]);
        let suggestion = engine.evaluate("bread", &AuxContext::default(), monday());
        assert_eq!(suggestion, Suggestion::none());
        assert!(!suggestion.is_match());
    }

    #[test]
    fn empty_registry_never_matches() {
        let engine = Evaluator::new(RuleRegistry::default());
        assert!(!engine.evaluate("urgent", &AuxContext::default(), monday()).is_match());
    }

    #[test]
    fn lists_all_matches_in_order() {
        let engine = evaluator(vec![
            keyword_rule("a", 1, "milk", Category::Task),
            keyword_rule("b", 5, "bread", Category::Task),
            keyword_rule("c", 3, "milk", Category::Note),
        ]);
        assert_eq!(
            engine.matching_rules("milk", &AuxContext::default(), monday()),
            vec!["a", "c"]
        );
    }

    #[test]
    fn content_helpers_need_no_rules() {
        assert!(Evaluator::contains_code("```\nx\n```"));
        assert!(Evaluator::contains_url("http://x.io"));
        assert!(!Evaluator::contains_url("plain"));
    }
}

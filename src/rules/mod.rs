//! Inbox rule engine.
//!
//! Every inbox item flows through:
//! 1. `EvaluationContext::new()`: content, parsed tokens, caller lookups, one clock read
//! 2. `RuleModule::evaluate()`: AND of compiled conditions, per registered rule
//! 3. Winner selection: highest priority, first registered on ties
//! 4. `RuleModule::build_action()`: template plus the rule's `ActionResolver`
//!
//! No match is a normal outcome and yields an empty `Suggestion`.

pub mod builtin;
pub mod conditions;
pub mod config;
pub mod dates;
pub mod engine;
pub mod module;
pub mod registry;
pub mod types;

pub use conditions::{Condition, ConditionKind, ConditionParam};
pub use config::{ActionTemplate, DueDateSpec, RuleConfig};
pub use engine::Evaluator;
pub use module::{ActionResolver, PassThrough, RuleModule};
pub use registry::{RuleDefinition, RuleRegistry};
pub use types::{AuxContext, Category, EvaluationContext, Priority, Suggestion};

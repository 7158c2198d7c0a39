//! Error types for the inbox engine.

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inbox error: {0}")]
    Inbox(#[from] InboxError),
}

/// Configuration-related errors.
///
/// Everything here is raised while loading settings or building the rule
/// registry, before any inbox item is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Rule {rule} references unknown condition: {condition}")]
    UnknownCondition { rule: String, condition: String },

    #[error("Invalid parameter for condition {condition} in rule {rule}: expected {expected}")]
    InvalidParameter {
        rule: String,
        condition: String,
        expected: String,
    },

    #[error("Duplicate rule name: {name}")]
    DuplicateRule { name: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inbox item errors.
#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error("Inbox item content must not be empty")]
    EmptyContent,

    #[error("Inbox item {id} cannot transition from {from} to {to}")]
    InvalidTransition { id: Uuid, from: String, to: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Configuration types.

use std::path::PathBuf;

use chrono::FixedOffset;

use crate::error::ConfigError;

/// Largest UTC offset accepted, in minutes (±14h).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Inbox engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxConfig {
    /// Optional JSON rules document, registered after the built-ins.
    pub rules_path: Option<PathBuf>,
    /// Whether the five built-in rules are registered.
    pub include_builtin_rules: bool,
    /// Offset from UTC used to decide what "today" is.
    pub utc_offset_minutes: i32,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            include_builtin_rules: true,
            utc_offset_minutes: 0,
        }
    }
}

impl InboxConfig {
    /// Read `TUDUDI_RULES_PATH`, `TUDUDI_BUILTIN_RULES` and
    /// `TUDUDI_UTC_OFFSET_MINUTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let rules_path = get("TUDUDI_RULES_PATH").map(PathBuf::from);

        let include_builtin_rules = match get("TUDUDI_BUILTIN_RULES") {
            Some(raw) => parse_bool("TUDUDI_BUILTIN_RULES", &raw)?,
            None => defaults.include_builtin_rules,
        };

        let utc_offset_minutes = match get("TUDUDI_UTC_OFFSET_MINUTES") {
            Some(raw) => raw.parse::<i32>().map_err(|e| ConfigError::InvalidValue {
                key: "TUDUDI_UTC_OFFSET_MINUTES".into(),
                message: format!("{raw:?} is not an integer: {e}"),
            })?,
            None => defaults.utc_offset_minutes,
        };

        let config = Self {
            rules_path,
            include_builtin_rules,
            utc_offset_minutes,
        };
        config.utc_offset()?;
        Ok(config)
    }

    /// Offset used for the evaluation date.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: "TUDUDI_UTC_OFFSET_MINUTES".into(),
            message: format!(
                "{} is outside ±{} minutes",
                self.utc_offset_minutes, MAX_UTC_OFFSET_MINUTES
            ),
        };
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(invalid());
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(invalid)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?} is not a boolean"),
        }),
    }
}

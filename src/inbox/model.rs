//! Inbox data model: items, statuses, and sources.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InboxError;

/// Lifecycle status of an inbox item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxStatus {
    /// Captured, waiting for triage.
    Added,
    /// Turned into a task/note/bookmark.
    Processed,
    /// Discarded.
    Deleted,
}

impl InboxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Processed => "processed",
            Self::Deleted => "deleted",
        }
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(&self, next: InboxStatus) -> bool {
        matches!(
            (self, next),
            (Self::Added, Self::Processed) | (Self::Added, Self::Deleted) | (Self::Processed, Self::Deleted)
        )
    }
}

impl fmt::Display for InboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an inbox item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxSource {
    /// Typed into the web UI.
    #[default]
    Manual,
    /// Forwarded by the Telegram bot.
    Telegram,
    /// Created through the REST API.
    Api,
}

/// A unit of captured free text awaiting triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxItem {
    /// Unique ID.
    pub id: Uuid,
    /// Free-text content as captured.
    pub content: String,
    /// Lifecycle status.
    pub status: InboxStatus,
    /// Origin channel.
    pub source: InboxSource,
    /// When the item was captured.
    pub created_at: DateTime<Utc>,
    /// When the item last changed.
    pub updated_at: DateTime<Utc>,
}

impl InboxItem {
    /// Capture new content. Blank content is rejected.
    pub fn new(content: impl Into<String>, source: InboxSource) -> Result<Self, InboxError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(InboxError::EmptyContent);
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            content,
            status: InboxStatus::Added,
            source,
            created_at: now,
            updated_at: now,
        })
    }

    /// Mark as processed once a suggestion has been accepted.
    pub fn mark_processed(&mut self) -> Result<(), InboxError> {
        self.transition(InboxStatus::Processed)
    }

    /// Mark as deleted.
    pub fn mark_deleted(&mut self) -> Result<(), InboxError> {
        self.transition(InboxStatus::Deleted)
    }

    pub fn is_pending(&self) -> bool {
        self.status == InboxStatus::Added
    }

    fn transition(&mut self, next: InboxStatus) -> Result<(), InboxError> {
        if !self.status.can_transition_to(next) {
            return Err(InboxError::InvalidTransition {
                id: self.id,
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_starts_added() {
        let item = InboxItem::new("Buy milk", InboxSource::Manual).unwrap();
        assert_eq!(item.status, InboxStatus::Added);
        assert!(item.is_pending());
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn blank_content_is_rejected() {
        assert!(matches!(
            InboxItem::new("   \n", InboxSource::Api),
            Err(InboxError::EmptyContent)
        ));
    }

    #[test]
    fn processed_items_can_still_be_deleted() {
        let mut item = InboxItem::new("note", InboxSource::Telegram).unwrap();
        item.mark_processed().unwrap();
        assert_eq!(item.status, InboxStatus::Processed);
        item.mark_deleted().unwrap();
        assert_eq!(item.status, InboxStatus::Deleted);
    }

    #[test]
    fn deleted_items_are_final() {
        let mut item = InboxItem::new("note", InboxSource::Manual).unwrap();
        item.mark_deleted().unwrap();
        let err = item.mark_processed().unwrap_err();
        match err {
            InboxError::InvalidTransition { from, to, .. } => {
                assert_eq!(from, "deleted");
                assert_eq!(to, "processed");
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn cannot_process_twice() {
        let mut item = InboxItem::new("note", InboxSource::Manual).unwrap();
        item.mark_processed().unwrap();
        assert!(item.mark_processed().is_err());
    }

    #[test]
    fn serializes_snake_case_enums() {
        let item = InboxItem::new("hi", InboxSource::Telegram).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["status"], "added");
        assert_eq!(json["source"], "telegram");
    }
}

//! Inbox items and the processing façade callers talk to.

pub mod model;
pub mod parse;
pub mod processor;

pub use model::{InboxItem, InboxSource, InboxStatus};
pub use parse::ParsedTokens;
pub use processor::InboxProcessingService;

//! tududi inbox: rule-based classification of captured inbox items.

pub mod config;
pub mod error;
pub mod inbox;
pub mod rules;

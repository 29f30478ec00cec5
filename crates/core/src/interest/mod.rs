//! Interest triggers.
//!
//! Condition/action rules that classify an inbound lead from its first
//! message, any message, WhatsApp push name or source name. Provides the
//! condition evaluator, the priority-ordered matcher and save-time
//! validation, all without database dependencies.

pub mod condition;
pub mod matcher;
pub mod trigger;
pub mod validation;

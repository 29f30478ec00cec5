//! Timer-based temperature transition rules.
//!
//! Rule types, the side-effect-free rule tester with its per-condition
//! reasons, the reason trace formatter and first-match rule selection.

pub mod rule;
pub mod selector;
pub mod tester;
pub mod trace;
pub mod validation;

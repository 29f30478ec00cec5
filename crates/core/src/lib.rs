//! Lead automation domain logic.
//!
//! Interest-trigger matching, temperature-transition rule testing and the
//! lead-state helpers around them. Everything here is pure: no database, no
//! clock reads, no global configuration.

pub mod error;
pub mod interest;
pub mod lead;
pub mod ordering;
pub mod settings;
pub mod transition;
pub mod types;

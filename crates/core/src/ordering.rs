//! Drag-and-drop reordering of priority-ordered collections.
//!
//! Both triggers and transition rules are ordered by an integer `priority`
//! (lower first). A reorder submits the full id list in its new order and
//! every priority is rewritten from it.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Check that `requested` is a permutation of `existing`.
pub fn validate_reorder(existing: &[DbId], requested: &[DbId]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Duplicate id {id} in reorder request"
            )));
        }
    }

    let existing: HashSet<DbId> = existing.iter().copied().collect();
    if let Some(unknown) = requested.iter().find(|id| !existing.contains(*id)) {
        return Err(CoreError::Validation(format!(
            "Id {unknown} does not belong to this collection"
        )));
    }

    let mut missing: Vec<DbId> = existing.difference(&seen).copied().collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        let listed: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
        return Err(CoreError::Validation(format!(
            "Reorder request must include every id; missing: {}",
            listed.join(", ")
        )));
    }

    Ok(())
}

/// Assign priority `i` to the id at position `i`.
pub fn priorities_for(requested: &[DbId]) -> Vec<(DbId, i32)> {
    requested
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as i32))
        .collect()
}

//! Pre-collection health check.
//!
//! Diffing a conflicted tree produces a patch that cannot be cleanly
//! reapplied, so every collection batch starts here: if any conflict-pair
//! category is non-empty the repository is blocked, with each offending path
//! named in the error. This state typically follows an interrupted
//! `stash pop`, cherry-pick, or merge.

use crate::classify::StatusReport;
use crate::error::{ConflictInfo, VaultError};
use crate::repo::WorkTree;

/// Verify a classified status report carries no unresolved conflicts.
///
/// # Errors
///
/// [`VaultError::RepoBlocked`] listing every conflicted path with its
/// conflict-pair description.
pub fn ensure_collectable(report: &StatusReport) -> Result<(), VaultError> {
    let conflicts: Vec<ConflictInfo> = report
        .conflicts()
        .into_iter()
        .map(|(entry, category)| {
            ConflictInfo::new(entry.path.clone(), category.describe().to_owned())
        })
        .collect();

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(VaultError::RepoBlocked { conflicts })
    }
}

/// Run a fresh status query and check it.
///
/// Convenience for callers that have no report in hand yet.
pub fn check(tree: &WorkTree) -> Result<(), VaultError> {
    ensure_collectable(&tree.status()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

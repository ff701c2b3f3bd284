//! Head and staged patch collection.
//!
//! Both operations share one shape: pick the candidate paths from the status
//! report, filter them, diff them, and write the result as a single patch.
//! The diff is restricted to the filtered path set via `git diff -- <paths>`
//! so excluded files never leak into the artifact.

use std::path::{Path, PathBuf};

use crate::classify::StatusReport;
use crate::error::VaultError;
use crate::filter::PathFilter;
use crate::repo::WorkTree;
use crate::store::{ArtifactKind, PatchArtifact, PatchStore};

/// Collect unstaged changes (working tree vs index) into `head.patch`.
///
/// # Errors
///
/// [`VaultError::EmptyAfterFilter`] when no unstaged change survives the
/// filter or the restricted diff comes out empty;
/// [`VaultError::AlreadyExists`] when `head.patch` is already present.
pub fn collect_head(
    tree: &WorkTree,
    store: &PatchStore,
    filter: &PathFilter,
) -> Result<PatchArtifact, VaultError> {
    collect_diff(tree, store, filter, false)
}

/// Collect staged changes (index vs HEAD) into `staged.patch`.
///
/// Same rules as [`collect_head`], with `git diff --cached` and the staged
/// candidate set.
pub fn collect_staged(
    tree: &WorkTree,
    store: &PatchStore,
    filter: &PathFilter,
) -> Result<PatchArtifact, VaultError> {
    collect_diff(tree, store, filter, true)
}

fn collect_diff(
    tree: &WorkTree,
    store: &PatchStore,
    filter: &PathFilter,
    cached: bool,
) -> Result<PatchArtifact, VaultError> {
    let (operation, name, kind) = if cached {
        ("staged", "staged.patch", ArtifactKind::Staged)
    } else {
        ("head", "head.patch", ArtifactKind::Head)
    };

    let report = tree.status()?;
    let kept = filter.apply(candidates(&report, cached));
    if kept.is_empty() {
        return Err(VaultError::EmptyAfterFilter { operation });
    }

    let diff = tree.diff(cached, &kept)?;
    if diff.trim().is_empty() {
        return Err(VaultError::EmptyAfterFilter { operation });
    }

    let target = store.reserve(tree.root(), Path::new(name))?;
    store.write_patch(&target, &diff)?;

    Ok(PatchArtifact {
        repo: tree.root().to_path_buf(),
        kind,
        path: target,
    })
}

/// The candidate paths for one side of the diff.
///
/// Staged candidates are entries with index-side changes (`M`/`A`/`D`/`R`);
/// head candidates are entries with worktree-side changes (`M`/`D`). For
/// renames the new path is the candidate.
fn candidates(report: &StatusReport, cached: bool) -> Vec<PathBuf> {
    report
        .entries()
        .filter(|(entry, _)| {
            if cached {
                matches!(entry.index, 'M' | 'A' | 'D' | 'R')
            } else {
                matches!(entry.worktree, 'M' | 'D')
            }
        })
        .map(|(entry, _)| entry.path.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

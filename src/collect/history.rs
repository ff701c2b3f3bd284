//! Historical-commit collection.
//!
//! `collect_previous` snapshots the last N commits; `collect_pick` snapshots
//! one commit by revision, independent of where HEAD currently points. Both
//! render via `git show`, whose output `git apply` accepts as a patch.

use std::path::Path;

use crate::error::VaultError;
use crate::repo::WorkTree;
use crate::store::{ArtifactKind, PatchArtifact, PatchStore};

/// Collect the last `count` commits as `<rank>_<hash>.patch` artifacts,
/// rank 1 being the newest commit.
///
/// Every artifact path is reserved before anything is written, so a
/// too-large `count` or a name collision fails without partial writes.
///
/// # Errors
///
/// [`VaultError::HistoryTooShort`] when `count` exceeds the commits
/// reachable from HEAD; [`VaultError::AlreadyExists`] when any target name
/// is taken.
pub fn collect_previous(
    tree: &WorkTree,
    store: &PatchStore,
    count: usize,
) -> Result<Vec<PatchArtifact>, VaultError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let available = tree.commit_count()?;
    if count > available {
        return Err(VaultError::HistoryTooShort {
            wanted: count,
            available,
        });
    }

    let hashes = tree.recent_commits(count)?;

    let mut reserved = Vec::with_capacity(hashes.len());
    for (rank, hash) in hashes.iter().enumerate() {
        let name = format!("{}_{}.patch", rank + 1, hash);
        reserved.push((store.reserve(tree.root(), Path::new(&name))?, hash));
    }

    let mut artifacts = Vec::with_capacity(reserved.len());
    for (target, hash) in reserved {
        let text = tree.show(hash)?;
        store.write_patch(&target, &text)?;
        artifacts.push(PatchArtifact {
            repo: tree.root().to_path_buf(),
            kind: ArtifactKind::Previous,
            path: target,
        });
    }

    Ok(artifacts)
}

/// Collect the change introduced by a single commit as `pick_<hash>.patch`.
///
/// The revision is resolved to a full hash first, so the artifact name is
/// stable regardless of how the caller spelled it (short hash, ref, `HEAD~2`).
///
/// # Errors
///
/// A git failure when `rev` does not resolve to a commit;
/// [`VaultError::AlreadyExists`] when the artifact is already present.
pub fn collect_pick(
    tree: &WorkTree,
    store: &PatchStore,
    rev: &str,
) -> Result<PatchArtifact, VaultError> {
    let hash = tree.resolve_commit(rev)?;
    let name = format!("pick_{hash}.patch");
    let target = store.reserve(tree.root(), Path::new(&name))?;
    let text = tree.show(&hash)?;
    store.write_patch(&target, &text)?;

    Ok(PatchArtifact {
        repo: tree.root().to_path_buf(),
        kind: ArtifactKind::Pick,
        path: target,
    })
}

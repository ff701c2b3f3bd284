//! Stash collection.
//!
//! The stash list is re-enumerated on every call — indices shift as entries
//! are popped or dropped, so nothing is cached. Artifacts are written in
//! stash order, newest first, named after the `stash@{N}` reference.

use std::path::Path;

use crate::error::VaultError;
use crate::repo::WorkTree;
use crate::store::{ArtifactKind, PatchArtifact, PatchStore};

/// Collect up to `max_count` stash entries as `stash@{N}.patch` artifacts,
/// newest first. A negative `max_count` collects the whole stash.
///
/// # Errors
///
/// [`VaultError::EmptyStash`] when the stash list is empty;
/// [`VaultError::AlreadyExists`] on an artifact collision.
pub fn collect_stash(
    tree: &WorkTree,
    store: &PatchStore,
    max_count: i64,
) -> Result<Vec<PatchArtifact>, VaultError> {
    let stashes = tree.stash_list()?;
    if stashes.is_empty() {
        return Err(VaultError::EmptyStash);
    }

    let take = usize::try_from(max_count).map_or(stashes.len(), |n| n.min(stashes.len()));

    let mut artifacts = Vec::with_capacity(take);
    for stash in &stashes[..take] {
        let text = tree.stash_show(stash)?;
        let name = format!("{}.patch", stash.name());
        let target = store.reserve(tree.root(), Path::new(&name))?;
        store.write_patch(&target, &text)?;
        artifacts.push(PatchArtifact {
            repo: tree.root().to_path_buf(),
            kind: ArtifactKind::Stash,
            path: target,
        });
    }

    Ok(artifacts)
}

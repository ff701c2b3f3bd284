//! Untracked-file collection.
//!
//! Untracked files are *copied*, not diffed: each survivor of the filter is
//! mirrored under `unversioned/` in the repository's vault subtree, with
//! intermediate directories created on demand. A file already present at its
//! destination fails that file — never a silent overwrite. An empty
//! untracked set is not an error; the batch simply produces zero files.

use std::path::Path;

use crate::error::VaultError;
use crate::filter::PathFilter;
use crate::repo::WorkTree;
use crate::store::{ArtifactKind, PatchArtifact, PatchStore};

/// Result of one unversioned batch.
#[derive(Debug, Default)]
pub struct UnversionedOutcome {
    /// Every file copied, in status order.
    pub artifacts: Vec<PatchArtifact>,
    /// Per-file collisions recorded when `keep_going` is set.
    pub collisions: Vec<VaultError>,
}

/// Copy untracked files into the vault's `unversioned/` subtree.
///
/// With `keep_going` unset, the first destination collision aborts the
/// batch; with it set, collisions are recorded and the remaining files are
/// still copied.
///
/// # Errors
///
/// [`VaultError::AlreadyExists`] on the first collision when `keep_going` is
/// unset; git/parse errors from the untracked query; I/O errors from
/// copying.
pub fn collect_unversioned(
    tree: &WorkTree,
    store: &PatchStore,
    filter: &PathFilter,
    keep_going: bool,
) -> Result<UnversionedOutcome, VaultError> {
    let kept = filter.apply(tree.untracked()?);

    let mut outcome = UnversionedOutcome::default();
    for file in kept {
        let rel = file.strip_prefix(tree.root()).map_err(|_| {
            VaultError::Io(std::io::Error::other(format!(
                "untracked path '{}' is outside the working tree",
                file.display()
            )))
        })?;
        let rel_name = Path::new("unversioned").join(rel);

        match store.reserve(tree.root(), &rel_name) {
            Ok(target) => {
                store.copy_file(&file, &target)?;
                outcome.artifacts.push(PatchArtifact {
                    repo: tree.root().to_path_buf(),
                    kind: ArtifactKind::Unversioned,
                    path: target,
                });
            }
            Err(collision @ VaultError::AlreadyExists { .. }) if keep_going => {
                outcome.collisions.push(collision);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(outcome)
}

//! The patch vault: on-disk storage for collected artifacts.
//!
//! Artifacts for a repository live under
//! `vault_root/<absolute-repo-path-as-nested-dirs>/`, so concurrent
//! collection across *different* repositories never collides. Within one
//! repository, [`PatchStore::reserve`] refuses to hand out a path whose file
//! already exists — artifacts are written once and never mutated. The
//! reservation is an existence check, not a lock; callers must serialize
//! concurrent collection against the same repository themselves.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::VaultError;

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// What kind of change an artifact snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Unstaged changes (`head.patch`).
    Head,
    /// Staged changes (`staged.patch`).
    Staged,
    /// A copied untracked file (under `unversioned/`).
    Unversioned,
    /// One stash entry (`stash@{N}.patch`).
    Stash,
    /// One historical commit (`<rank>_<hash>.patch`).
    Previous,
    /// A single commit picked by hash (`pick_<hash>.patch`).
    Pick,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Staged => f.write_str("staged"),
            Self::Unversioned => f.write_str("unversioned"),
            Self::Stash => f.write_str("stash"),
            Self::Previous => f.write_str("previous"),
            Self::Pick => f.write_str("pick"),
        }
    }
}

// ---------------------------------------------------------------------------
// PatchArtifact
// ---------------------------------------------------------------------------

/// One artifact written by a collection operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchArtifact {
    /// The repository the artifact was collected from.
    pub repo: PathBuf,
    /// What the artifact snapshots.
    pub kind: ArtifactKind,
    /// Absolute path of the written file inside the vault.
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// PatchStore
// ---------------------------------------------------------------------------

/// Handle to the vault root directory.
#[derive(Debug)]
pub struct PatchStore {
    root: PathBuf,
}

impl PatchStore {
    /// Open an existing vault root.
    ///
    /// # Errors
    ///
    /// [`VaultError::StorageNotFound`] when the directory does not exist.
    pub fn open(root: &Path) -> Result<Self, VaultError> {
        if !root.is_dir() {
            return Err(VaultError::StorageNotFound {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The vault subdirectory for a repository: the repository's absolute
    /// path mirrored as nested directories under the root.
    pub fn repo_dir(&self, repo_root: &Path) -> PathBuf {
        let mut dir = self.root.clone();
        for component in repo_root.components() {
            if let Component::Normal(part) = component {
                dir.push(part);
            }
        }
        dir
    }

    /// Reserve an artifact path for `rel_name` under the repository's vault
    /// subdirectory: fail if the file already exists, otherwise create the
    /// parent directories and hand the path back for writing.
    ///
    /// # Errors
    ///
    /// [`VaultError::AlreadyExists`] on collision; I/O errors from directory
    /// creation.
    pub fn reserve(&self, repo_root: &Path, rel_name: &Path) -> Result<PathBuf, VaultError> {
        let target = self.repo_dir(repo_root).join(rel_name);
        if target.exists() {
            return Err(VaultError::AlreadyExists { path: target });
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %target.display(), "reserved artifact path");
        Ok(target)
    }

    /// Write patch text to a previously reserved path.
    pub fn write_patch(&self, target: &Path, contents: &str) -> Result<(), VaultError> {
        fs::write(target, contents)?;
        info!(path = %target.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }

    /// Copy a file into a previously reserved path.
    pub fn copy_file(&self, source: &Path, target: &Path) -> Result<(), VaultError> {
        fs::copy(source, target)?;
        info!(
            from = %source.display(),
            to = %target.display(),
            "copied artifact"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_missing_root_is_storage_not_found() {
        let err = PatchStore::open(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, VaultError::StorageNotFound { .. }), "got {err}");
    }

    #[test]
    fn repo_dir_mirrors_absolute_path() {
        let vault = TempDir::new().unwrap();
        let store = PatchStore::open(vault.path()).unwrap();
        let dir = store.repo_dir(Path::new("/home/dev/proj"));
        assert_eq!(dir, vault.path().join("home").join("dev").join("proj"));
    }

    #[test]
    fn different_repos_never_share_a_subtree() {
        let vault = TempDir::new().unwrap();
        let store = PatchStore::open(vault.path()).unwrap();
        let a = store.repo_dir(Path::new("/home/dev/alpha"));
        let b = store.repo_dir(Path::new("/home/dev/beta"));
        assert_ne!(a, b);
        assert!(!a.starts_with(&b) && !b.starts_with(&a));
    }

    #[test]
    fn reserve_creates_parents_and_returns_target() {
        let vault = TempDir::new().unwrap();
        let store = PatchStore::open(vault.path()).unwrap();
        let target = store
            .reserve(Path::new("/home/dev/proj"), Path::new("head.patch"))
            .unwrap();
        assert!(target.parent().unwrap().is_dir());
        assert!(!target.exists());
        assert!(target.ends_with("home/dev/proj/head.patch"));
    }

    #[test]
    fn reserve_refuses_existing_artifact() {
        let vault = TempDir::new().unwrap();
        let store = PatchStore::open(vault.path()).unwrap();
        let repo = Path::new("/home/dev/proj");

        let target = store.reserve(repo, Path::new("head.patch")).unwrap();
        store.write_patch(&target, "diff --git a/x b/x\n").unwrap();

        let err = store.reserve(repo, Path::new("head.patch")).unwrap_err();
        match err {
            VaultError::AlreadyExists { path } => assert_eq!(path, target),
            other => panic!("expected AlreadyExists, got {other}"),
        }
        // The first artifact is untouched.
        let kept = fs::read_to_string(&target).unwrap();
        assert_eq!(kept, "diff --git a/x b/x\n");
    }

    #[test]
    fn reserve_allows_nested_relative_names() {
        let vault = TempDir::new().unwrap();
        let store = PatchStore::open(vault.path()).unwrap();
        let target = store
            .reserve(
                Path::new("/home/dev/proj"),
                Path::new("unversioned/sub/dir/new.txt"),
            )
            .unwrap();
        assert!(target.parent().unwrap().is_dir());
    }

    #[test]
    fn copy_file_preserves_content() {
        let vault = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let source = scratch.path().join("src.txt");
        fs::write(&source, "payload").unwrap();

        let store = PatchStore::open(vault.path()).unwrap();
        let target = store
            .reserve(Path::new("/home/dev/proj"), Path::new("unversioned/src.txt"))
            .unwrap();
        store.copy_file(&source, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "payload");
    }
}

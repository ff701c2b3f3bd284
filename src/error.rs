//! Unified error type for vault operations.
//!
//! Defines [`VaultError`], the error surface of the status/collection engine.
//! Messages are designed to be self-contained: each variant describes what
//! went wrong and, where a fix exists, how to fix it. Expected control-flow
//! conditions (missing repo, empty filter result, artifact collisions) are
//! errors, never panics; panics are reserved for programmer mistakes.

use std::fmt;
use std::path::PathBuf;

use crate::classify::ClassifyError;
use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::porcelain::ParseError;
use crate::repo::GitError;

// ---------------------------------------------------------------------------
// ConflictInfo
// ---------------------------------------------------------------------------

/// Summary information about a single conflicted file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictInfo {
    /// Absolute path to the conflicted file.
    pub path: PathBuf,
    /// Human-readable description of the conflict pair (e.g. "added/added",
    /// "deleted/updated").
    pub description: String,
}

impl ConflictInfo {
    /// Create a new conflict summary.
    pub const fn new(path: PathBuf, description: String) -> Self {
        Self { path, description }
    }
}

impl fmt::Display for ConflictInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.description)
    }
}

// ---------------------------------------------------------------------------
// VaultError
// ---------------------------------------------------------------------------

/// Unified error type for status classification and patch collection.
#[derive(Debug)]
pub enum VaultError {
    /// The repository path is missing or not inside a git working tree.
    RepoNotFound {
        /// The path that was offered.
        path: PathBuf,
    },

    /// The path names a bare repository, which has no working tree to
    /// snapshot.
    BareRepository {
        /// The bare repository path.
        path: PathBuf,
    },

    /// The repository carries unresolved conflicts and cannot be safely
    /// snapshotted.
    RepoBlocked {
        /// One summary per conflicted file.
        conflicts: Vec<ConflictInfo>,
    },

    /// The vault root directory does not exist.
    StorageNotFound {
        /// The missing vault root.
        path: PathBuf,
    },

    /// An artifact already exists at its target location.
    AlreadyExists {
        /// The colliding artifact path.
        path: PathBuf,
    },

    /// After filtering, no paths remained where the operation requires at
    /// least one.
    EmptyAfterFilter {
        /// The operation that came up empty (e.g. "head", "staged").
        operation: &'static str,
    },

    /// Stash collection was requested but the stash list is empty.
    EmptyStash,

    /// More history was requested than the repository has.
    HistoryTooShort {
        /// How many commits were requested.
        wanted: usize,
        /// How many commits exist.
        available: usize,
    },

    /// A collection step failed; wraps the underlying error with the step
    /// name and repository path.
    StepFailed {
        /// The collection step (e.g. "head", "stash").
        step: &'static str,
        /// The repository being collected.
        repo: PathBuf,
        /// The underlying failure.
        source: Box<VaultError>,
    },

    /// A git subprocess failed.
    Git(GitError),

    /// Porcelain output could not be parsed.
    Parse(ParseError),

    /// A status code pair was not recognized.
    Classify(ClassifyError),

    /// A glob pattern failed to compile.
    Filter(FilterError),

    /// The configuration file could not be loaded or parsed.
    Config(ConfigError),

    /// An I/O error during a vault operation.
    Io(std::io::Error),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepoNotFound { path } => {
                write!(
                    f,
                    "'{}' is not a git working tree.\n  To fix: check the path, or run `git status` there to see what git thinks.",
                    path.display()
                )
            }
            Self::BareRepository { path } => {
                write!(
                    f,
                    "'{}' is a bare repository — it has no working tree to snapshot.\n  To fix: point at a checkout of this repository instead.",
                    path.display()
                )
            }
            Self::RepoBlocked { conflicts } => {
                write!(
                    f,
                    "repository has {} unresolved conflict(s):",
                    conflicts.len()
                )?;
                for c in conflicts {
                    write!(f, "\n  - {c}")?;
                }
                write!(
                    f,
                    "\n  To fix: resolve the conflicts (usually left by an interrupted stash pop or merge), then retry."
                )
            }
            Self::StorageNotFound { path } => {
                write!(
                    f,
                    "vault root '{}' does not exist.\n  To fix: create the directory, or pass a different --vault.",
                    path.display()
                )
            }
            Self::AlreadyExists { path } => {
                write!(
                    f,
                    "artifact '{}' already exists.\n  To fix: move or delete the previous artifact first; nothing is ever overwritten.",
                    path.display()
                )
            }
            Self::EmptyAfterFilter { operation } => {
                write!(
                    f,
                    "nothing to collect for '{operation}' after filtering.\n  To fix: loosen the include/exclude patterns, or skip this step."
                )
            }
            Self::EmptyStash => {
                write!(
                    f,
                    "the stash list is empty.\n  To fix: create a stash first, or skip stash collection."
                )
            }
            Self::HistoryTooShort { wanted, available } => {
                write!(
                    f,
                    "requested {wanted} commit(s) but history only has {available}.\n  To fix: lower the count."
                )
            }
            Self::StepFailed { step, repo, source } => {
                write!(
                    f,
                    "collection step '{step}' failed for '{}': {source}",
                    repo.display()
                )
            }
            Self::Git(e) => write!(f, "git failure: {e}"),
            Self::Parse(e) => write!(f, "status parse error: {e}"),
            Self::Classify(e) => write!(f, "status classify error: {e}"),
            Self::Filter(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StepFailed { source, .. } => Some(source.as_ref()),
            Self::Git(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Classify(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GitError> for VaultError {
    fn from(e: GitError) -> Self {
        Self::Git(e)
    }
}

impl From<ParseError> for VaultError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<ClassifyError> for VaultError {
    fn from(e: ClassifyError) -> Self {
        Self::Classify(e)
    }
}

impl From<FilterError> for VaultError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

impl From<ConfigError> for VaultError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for VaultError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Status classification over parsed porcelain entries.
//!
//! Git encodes merge-conflict states (left behind when a `stash pop`,
//! cherry-pick, or merge collides with committed changes) using code pairs
//! that are easy to misread — `UD` is "updated here, deleted upstream" while
//! `DU` is the reverse. This module centralizes the code-pair mapping once so
//! every caller reads the same meaning.
//!
//! # Invariants
//!
//! - **Closed table**: every recognized two-character code maps to exactly
//!   one [`StatusCategory`]; anything else is a hard
//!   [`ClassifyError::Unrecognized`], never silently grouped or dropped.
//! - A rename whose new path is also modified in the working tree (`RM`)
//!   classifies as [`StatusCategory::RenamedModified`], not `Renamed`.

use std::fmt;
use std::path::PathBuf;

use crate::porcelain::StatusEntry;

// ---------------------------------------------------------------------------
// StatusCategory
// ---------------------------------------------------------------------------

/// The category assigned to a `(index, worktree)` status code pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// Content changed, staged or not (`" M"`, `"M "`, `"MM"`).
    Modified,
    /// New file staged in the index (`"A "`, `"AM"`).
    Added,
    /// File deleted, staged or not (`" D"`, `"D "`).
    Deleted,
    /// File renamed in the index (`"R "`).
    Renamed,
    /// File renamed in the index and modified again in the worktree (`"RM"`).
    RenamedModified,
    /// Untracked file (`"??"`).
    Unversioned,
    /// Both sides added the file (`"AA"`).
    AddedAdded,
    /// Both sides deleted the file (`"DD"`).
    DeletedDeleted,
    /// Updated here, deleted upstream (`"UD"`).
    UpdatedDeleted,
    /// Deleted here, updated upstream (`"DU"`).
    DeletedUpdated,
    /// Added here, updated upstream (`"AU"`).
    AddedUpdated,
    /// Updated here, added upstream (`"UA"`).
    UpdatedAdded,
    /// Both sides updated the file (`"UU"`).
    UpdatedUpdated,
}

/// Every category, in display order.
pub const ALL_CATEGORIES: [StatusCategory; 13] = [
    StatusCategory::Modified,
    StatusCategory::Added,
    StatusCategory::Deleted,
    StatusCategory::Renamed,
    StatusCategory::RenamedModified,
    StatusCategory::Unversioned,
    StatusCategory::AddedAdded,
    StatusCategory::DeletedDeleted,
    StatusCategory::UpdatedDeleted,
    StatusCategory::DeletedUpdated,
    StatusCategory::AddedUpdated,
    StatusCategory::UpdatedAdded,
    StatusCategory::UpdatedUpdated,
];

impl StatusCategory {
    /// Whether this category only arises from an unresolved merge-like
    /// operation (stash pop, cherry-pick, merge).
    pub const fn is_conflict(self) -> bool {
        matches!(
            self,
            Self::AddedAdded
                | Self::DeletedDeleted
                | Self::UpdatedDeleted
                | Self::DeletedUpdated
                | Self::AddedUpdated
                | Self::UpdatedAdded
                | Self::UpdatedUpdated
        )
    }

    /// Short human label, e.g. `"added/added"` for conflict pairs.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::RenamedModified => "renamed and modified",
            Self::Unversioned => "unversioned",
            Self::AddedAdded => "added/added",
            Self::DeletedDeleted => "deleted/deleted",
            Self::UpdatedDeleted => "updated/deleted",
            Self::DeletedUpdated => "deleted/updated",
            Self::AddedUpdated => "added/updated",
            Self::UpdatedAdded => "updated/added",
            Self::UpdatedUpdated => "updated/updated",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Map a `(index, worktree)` code pair to its category.
///
/// Returns `None` for unrecognized pairs; [`classify`] turns that into a
/// hard error carrying the offending path.
pub const fn category_for(index: char, worktree: char) -> Option<StatusCategory> {
    Some(match (index, worktree) {
        (' ', 'M') | ('M', ' ' | 'M') => StatusCategory::Modified,
        ('A', ' ' | 'M') => StatusCategory::Added,
        (' ', 'D') | ('D', ' ') => StatusCategory::Deleted,
        ('R', ' ') => StatusCategory::Renamed,
        ('R', 'M') => StatusCategory::RenamedModified,
        ('?', '?') => StatusCategory::Unversioned,
        ('A', 'A') => StatusCategory::AddedAdded,
        ('D', 'D') => StatusCategory::DeletedDeleted,
        ('U', 'D') => StatusCategory::UpdatedDeleted,
        ('D', 'U') => StatusCategory::DeletedUpdated,
        ('A', 'U') => StatusCategory::AddedUpdated,
        ('U', 'A') => StatusCategory::UpdatedAdded,
        ('U', 'U') => StatusCategory::UpdatedUpdated,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// ClassifyError
// ---------------------------------------------------------------------------

/// Errors from classifying status entries.
#[derive(Debug)]
pub enum ClassifyError {
    /// A status code pair outside the recognized table.
    Unrecognized {
        /// The two-character code as printed by git.
        code: String,
        /// The path the code was attached to.
        path: PathBuf,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized { code, path } => {
                write!(
                    f,
                    "unrecognized status code {code:?} for '{}'",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

// ---------------------------------------------------------------------------
// StatusReport
// ---------------------------------------------------------------------------

/// The classified view over one status query.
#[derive(Debug, Default)]
pub struct StatusReport {
    entries: Vec<(StatusEntry, StatusCategory)>,
}

impl StatusReport {
    /// All entries with their categories, in porcelain output order.
    pub fn entries(&self) -> impl Iterator<Item = &(StatusEntry, StatusCategory)> {
        self.entries.iter()
    }

    /// Entries in the given category.
    pub fn of(&self, category: StatusCategory) -> Vec<&StatusEntry> {
        self.entries
            .iter()
            .filter(|(_, c)| *c == category)
            .map(|(e, _)| e)
            .collect()
    }

    /// Entries with unstaged content changes (`" M"`, `"MM"`).
    pub fn modified(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::Modified)
    }

    /// Entries staged as new files.
    pub fn added(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::Added)
    }

    /// Deleted entries, staged or not.
    pub fn deleted(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::Deleted)
    }

    /// Renamed entries; each carries `orig_path`.
    pub fn renamed(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::Renamed)
    }

    /// Renames whose new path is also modified in the worktree.
    pub fn renamed_modified(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::RenamedModified)
    }

    /// Untracked entries.
    pub fn unversioned(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::Unversioned)
    }

    /// `AA` conflict entries.
    pub fn added_added(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::AddedAdded)
    }

    /// `DD` conflict entries.
    pub fn deleted_deleted(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::DeletedDeleted)
    }

    /// `UD` conflict entries.
    pub fn updated_deleted(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::UpdatedDeleted)
    }

    /// `DU` conflict entries.
    pub fn deleted_updated(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::DeletedUpdated)
    }

    /// `AU` conflict entries.
    pub fn added_updated(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::AddedUpdated)
    }

    /// `UA` conflict entries.
    pub fn updated_added(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::UpdatedAdded)
    }

    /// `UU` conflict entries.
    pub fn updated_updated(&self) -> Vec<&StatusEntry> {
        self.of(StatusCategory::UpdatedUpdated)
    }

    /// All entries in conflict-pair categories, with their categories.
    pub fn conflicts(&self) -> Vec<(&StatusEntry, StatusCategory)> {
        self.entries
            .iter()
            .filter(|(_, c)| c.is_conflict())
            .map(|(e, c)| (e, *c))
            .collect()
    }

    /// True iff nothing is pending. When `ignore_unversioned` is set,
    /// untracked files do not count against cleanliness.
    pub fn is_clear(&self, ignore_unversioned: bool) -> bool {
        self.entries.iter().all(|(_, c)| {
            ignore_unversioned && *c == StatusCategory::Unversioned
        })
    }

    /// Number of classified entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify parsed entries into a [`StatusReport`].
///
/// # Errors
///
/// Returns [`ClassifyError::Unrecognized`] on the first entry whose code pair
/// is outside the recognized table.
pub fn classify(entries: Vec<StatusEntry>) -> Result<StatusReport, ClassifyError> {
    let mut classified = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(category) = category_for(entry.index, entry.worktree) else {
            return Err(ClassifyError::Unrecognized {
                code: format!("{}{}", entry.index, entry.worktree),
                path: entry.path,
            });
        };
        classified.push((entry, category));
    }
    Ok(StatusReport {
        entries: classified,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

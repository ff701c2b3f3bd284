//! Patch collection: snapshot uncommitted or historical changes into the
//! vault, one artifact per requested category.
//!
//! # Invariants
//!
//! - **Guard first**: every batch starts with the repo health guard and
//!   aborts before any storage I/O when the repository is blocked,
//!   regardless of `best_effort`.
//! - **Fixed order**: requested steps always run as head, staged,
//!   unversioned, stash, previous.
//! - **No overwrites**: each artifact path is reserved before writing; a
//!   collision fails that artifact instead of replacing it.
//! - **Wrapped failures**: a failing step surfaces as `StepFailed` carrying
//!   the step name and repository path around the underlying error.

mod history;
mod patch;
mod stash;
mod unversioned;

use std::fmt;

pub use history::{collect_pick, collect_previous};
pub use patch::{collect_head, collect_staged};
pub use stash::collect_stash;
pub use unversioned::{collect_unversioned, UnversionedOutcome};

use tracing::info;

use crate::error::VaultError;
use crate::filter::PathFilter;
use crate::guard;
use crate::repo::WorkTree;
use crate::store::{PatchArtifact, PatchStore};

// ---------------------------------------------------------------------------
// CollectRequest
// ---------------------------------------------------------------------------

/// Which categories to collect, and how.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct CollectRequest {
    /// Collect unstaged changes into `head.patch`.
    pub head: bool,
    /// Collect staged changes into `staged.patch`.
    pub staged: bool,
    /// Copy untracked files under `unversioned/`.
    pub unversioned: bool,
    /// Collect up to N stash entries; negative means all. `None` skips.
    pub stash: Option<i64>,
    /// Collect the last N commits. `None` skips.
    pub previous: Option<usize>,
    /// Keep going after a step fails, aggregating errors in the outcome.
    pub best_effort: bool,
    /// Path filter applied to head/staged/unversioned candidates.
    pub filter: PathFilter,
}

impl Default for CollectRequest {
    fn default() -> Self {
        Self {
            head: false,
            staged: false,
            unversioned: false,
            stash: None,
            previous: None,
            best_effort: false,
            filter: PathFilter::include_all(),
        }
    }
}

// ---------------------------------------------------------------------------
// CollectOutcome
// ---------------------------------------------------------------------------

/// One step's failure inside a best-effort batch.
#[derive(Debug)]
pub struct StepFailure {
    /// The step that failed.
    pub step: &'static str,
    /// The underlying error.
    pub error: VaultError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.error)
    }
}

/// Aggregate result of a collection batch.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Every artifact written, in step order.
    pub artifacts: Vec<PatchArtifact>,
    /// Failures recorded under `best_effort`.
    pub failures: Vec<StepFailure>,
}

impl CollectOutcome {
    /// True iff no step failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// collect
// ---------------------------------------------------------------------------

/// Run a collection batch against one repository.
///
/// Invokes the health guard, then the requested steps in fixed order. With
/// `best_effort` unset the first failure aborts the remaining steps (already
/// written artifacts stay on disk); with it set, every step is attempted and
/// failures are aggregated in the returned outcome.
///
/// # Errors
///
/// [`VaultError::RepoBlocked`] before any storage I/O when conflicts exist;
/// otherwise [`VaultError::StepFailed`] wrapping the first failing step when
/// `best_effort` is unset.
pub fn collect(
    tree: &WorkTree,
    store: &PatchStore,
    request: &CollectRequest,
) -> Result<CollectOutcome, VaultError> {
    let report = tree.status()?;
    guard::ensure_collectable(&report)?;

    let mut outcome = CollectOutcome::default();

    if request.head {
        let result = collect_head(tree, store, &request.filter).map(|a| vec![a]);
        run_step(&mut outcome, tree, request.best_effort, "head", result)?;
    }

    if request.staged {
        let result = collect_staged(tree, store, &request.filter).map(|a| vec![a]);
        run_step(&mut outcome, tree, request.best_effort, "staged", result)?;
    }

    if request.unversioned {
        match collect_unversioned(tree, store, &request.filter, request.best_effort) {
            Ok(unversioned) => {
                outcome.artifacts.extend(unversioned.artifacts);
                outcome.failures.extend(
                    unversioned
                        .collisions
                        .into_iter()
                        .map(|error| StepFailure {
                            step: "unversioned",
                            error,
                        }),
                );
            }
            Err(e) => {
                run_step(&mut outcome, tree, request.best_effort, "unversioned", Err(e))?;
            }
        }
    }

    if let Some(max_count) = request.stash {
        let result = collect_stash(tree, store, max_count);
        run_step(&mut outcome, tree, request.best_effort, "stash", result)?;
    }

    if let Some(count) = request.previous {
        let result = collect_previous(tree, store, count);
        run_step(&mut outcome, tree, request.best_effort, "previous", result)?;
    }

    info!(
        repo = %tree.root().display(),
        artifacts = outcome.artifacts.len(),
        failures = outcome.failures.len(),
        "collection batch finished"
    );
    Ok(outcome)
}

/// Fold one step's result into the outcome, honoring `best_effort`.
fn run_step(
    outcome: &mut CollectOutcome,
    tree: &WorkTree,
    best_effort: bool,
    step: &'static str,
    result: Result<Vec<PatchArtifact>, VaultError>,
) -> Result<(), VaultError> {
    match result {
        Ok(mut artifacts) => {
            outcome.artifacts.append(&mut artifacts);
            Ok(())
        }
        Err(error) if best_effort => {
            outcome.failures.push(StepFailure { step, error });
            Ok(())
        }
        Err(error) => Err(VaultError::StepFailed {
            step,
            repo: tree.root().to_path_buf(),
            source: Box::new(error),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

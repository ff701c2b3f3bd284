//! Include/exclude glob filtering over candidate path sets.
//!
//! Both pattern lists are deny-lists: `primary` is consulted only in
//! [`FilterMode::Exclude`], `secondary` is always active. A candidate
//! survives only if it matches no pattern in whichever list(s) apply, so
//! `Include` mode means "include everything except the secondary patterns".
//! This asymmetric convention is deliberate (see DESIGN.md).
//!
//! Matching is shell-style (`*`, `?`, `[...]`) via [`glob::Pattern`] against
//! the full absolute path string, case-sensitive. Filtering is a pure
//! function of its inputs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use glob::Pattern;

// ---------------------------------------------------------------------------
// FilterMode
// ---------------------------------------------------------------------------

/// Which deny-lists apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Only the always-active secondary list applies.
    #[default]
    Include,
    /// Both the primary and secondary lists apply.
    Exclude,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => f.write_str("include"),
            Self::Exclude => f.write_str("exclude"),
        }
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            _ => anyhow::bail!("invalid filter mode '{s}'. Use: include or exclude"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterError
// ---------------------------------------------------------------------------

/// A glob pattern failed to compile.
#[derive(Debug)]
pub struct FilterError {
    /// The pattern as given by the caller.
    pub pattern: String,
    /// The compiler's description of the problem.
    pub reason: String,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid glob pattern '{}': {}", self.pattern, self.reason)
    }
}

impl std::error::Error for FilterError {}

// ---------------------------------------------------------------------------
// PathFilter
// ---------------------------------------------------------------------------

/// A compiled include/exclude filter.
#[derive(Debug)]
pub struct PathFilter {
    mode: FilterMode,
    primary: Vec<Pattern>,
    secondary: Vec<Pattern>,
}

impl PathFilter {
    /// Compile a filter from raw glob strings.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] on the first pattern that fails to compile.
    pub fn new<S1: AsRef<str>, S2: AsRef<str>>(
        mode: FilterMode,
        primary: &[S1],
        secondary: &[S2],
    ) -> Result<Self, FilterError> {
        Ok(Self {
            mode,
            primary: compile(primary)?,
            secondary: compile(secondary)?,
        })
    }

    /// A filter that keeps every candidate.
    pub fn include_all() -> Self {
        Self {
            mode: FilterMode::Include,
            primary: Vec::new(),
            secondary: Vec::new(),
        }
    }

    /// Whether `path` survives the filter.
    pub fn keeps(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        if self.mode == FilterMode::Exclude && self.primary.iter().any(|p| p.matches(&text)) {
            return false;
        }
        !self.secondary.iter().any(|p| p.matches(&text))
    }

    /// Apply the filter, preserving candidate order.
    pub fn apply(&self, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        candidates.into_iter().filter(|p| self.keeps(p)).collect()
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>, FilterError> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw.as_ref()).map_err(|e| FilterError {
                pattern: raw.as_ref().to_owned(),
                reason: e.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

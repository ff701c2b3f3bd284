//! Repository handle and git subprocess plumbing.
//!
//! [`WorkTree`] wraps a validated working-tree root and drives the installed
//! `git` binary via subprocess calls. All invocations are blocking and
//! strictly sequential; stdout/stderr are captured, and a non-zero exit
//! becomes a [`GitError`] carrying the command line and stderr verbatim.
//!
//! Bare repositories cannot be opened as a [`WorkTree`] (there is nothing to
//! snapshot), but the standalone query functions at the bottom of this
//! module accept them for read-only branch/remote questions.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::classify::{self, StatusReport};
use crate::error::VaultError;
use crate::porcelain;

// ---------------------------------------------------------------------------
// GitError
// ---------------------------------------------------------------------------

/// A git subprocess failed.
#[derive(Debug)]
pub enum GitError {
    /// The process ran but exited non-zero.
    Command {
        /// The full command line (for diagnostics).
        command: String,
        /// Captured stderr, verbatim apart from trailing whitespace.
        stderr: String,
        /// Process exit code, if available.
        exit_code: Option<i32>,
    },
    /// The process could not be spawned at all.
    Launch {
        /// The full command line.
        command: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command {
                command,
                stderr,
                exit_code,
            } => {
                write!(f, "`{command}` failed")?;
                if let Some(code) = exit_code {
                    write!(f, " (exit code {code})")?;
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            Self::Launch { command, source } => {
                write!(f, "failed to launch `{command}`: {source}")
            }
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            Self::Command { .. } => None,
        }
    }
}

/// Run git in `dir` and return raw stdout.
fn git_stdout<S: AsRef<OsStr>>(dir: &Path, args: &[S]) -> Result<String, GitError> {
    let cmdline = format!(
        "git {}",
        args.iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    );
    debug!(command = %cmdline, cwd = %dir.display(), "running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| GitError::Launch {
            command: cmdline.clone(),
            source: e,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        warn!(command = %cmdline, %stderr, "git command failed");
        Err(GitError::Command {
            command: cmdline,
            stderr,
            exit_code: output.status.code(),
        })
    }
}

/// Run git in `dir`; true iff it succeeded and printed exactly `"true"`.
fn git_says_true(dir: &Path, args: &[&str]) -> bool {
    git_stdout(dir, args).is_ok_and(|out| out.trim() == "true")
}

// ---------------------------------------------------------------------------
// StashRef
// ---------------------------------------------------------------------------

/// One entry of `git stash list`, newest first.
///
/// Ephemeral: indices shift as stashes are popped or dropped, so references
/// are re-enumerated on every call and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StashRef {
    /// Position in the stash list; `0` is the newest entry.
    pub index: usize,
    /// The list line as printed by git (e.g. `"stash@{0}: WIP on main: …"`).
    pub summary: String,
}

impl StashRef {
    /// The `stash@{N}` name git commands accept.
    pub fn name(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

// ---------------------------------------------------------------------------
// WorkTree
// ---------------------------------------------------------------------------

/// A validated git working tree, identified by its absolute root path.
#[derive(Debug)]
pub struct WorkTree {
    root: PathBuf,
}

impl WorkTree {
    /// Open `path` as a git working tree.
    ///
    /// The path must exist and lie inside a non-bare repository; the handle
    /// is normalized to the tree's top-level directory.
    ///
    /// # Errors
    ///
    /// [`VaultError::RepoNotFound`] when the path is missing or not inside a
    /// work tree; [`VaultError::BareRepository`] when it points into a bare
    /// repository.
    pub fn open(path: &Path) -> Result<Self, VaultError> {
        if !path.exists() {
            return Err(VaultError::RepoNotFound {
                path: path.to_path_buf(),
            });
        }
        let probe = path.canonicalize()?;

        if !git_says_true(&probe, &["rev-parse", "--is-inside-work-tree"]) {
            if git_says_true(&probe, &["rev-parse", "--is-bare-repository"]) {
                return Err(VaultError::BareRepository { path: probe });
            }
            return Err(VaultError::RepoNotFound { path: probe });
        }

        let top = git_stdout(&probe, &["rev-parse", "--show-toplevel"])?;
        Ok(Self {
            root: PathBuf::from(top.trim()),
        })
    }

    /// The absolute top-level path of the working tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<String, GitError> {
        git_stdout(&self.root, args)
    }

    /// Full classified status via `git status --porcelain=v1`.
    pub fn status(&self) -> Result<StatusReport, VaultError> {
        let out = self.git(&["status", "--porcelain=v1"])?;
        let entries = porcelain::parse_porcelain(&self.root, &out)?;
        Ok(classify::classify(entries)?)
    }

    /// Absolute paths of untracked files, via the `-s` short status form.
    ///
    /// `--untracked-files=all` expands untracked directories so every file
    /// is listed individually (required for mirrored copying).
    pub fn untracked(&self) -> Result<Vec<PathBuf>, VaultError> {
        let out = self.git(&["status", "-s", "--untracked-files=all"])?;
        let entries = porcelain::parse_porcelain(&self.root, &out)?;
        let report = classify::classify(entries)?;
        Ok(report
            .unversioned()
            .into_iter()
            .map(|e| e.path.clone())
            .collect())
    }

    /// Enumerate the stash, newest first.
    pub fn stash_list(&self) -> Result<Vec<StashRef>, GitError> {
        let out = self.git(&["stash", "list"])?;
        Ok(out
            .lines()
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(index, line)| StashRef {
                index,
                summary: line.to_owned(),
            })
            .collect())
    }

    /// Render one stash entry as a patch via `git stash show -p`.
    pub fn stash_show(&self, stash: &StashRef) -> Result<String, GitError> {
        self.git(&["stash", "show", "-p", &stash.name()])
    }

    /// The most recent `n` commit hashes, newest first.
    pub fn recent_commits(&self, n: usize) -> Result<Vec<String>, GitError> {
        let out = self.git(&["log", "-n", &n.to_string(), "--format=%H"])?;
        Ok(out.lines().map(str::to_owned).collect())
    }

    /// Total number of commits reachable from HEAD.
    pub fn commit_count(&self) -> Result<usize, GitError> {
        let out = self.git(&["rev-list", "--count", "HEAD"])?;
        out.trim().parse().map_err(|_| GitError::Command {
            command: "git rev-list --count HEAD".to_owned(),
            stderr: format!("unexpected count output: {}", out.trim()),
            exit_code: None,
        })
    }

    /// Render the change a single commit introduced, via `git show`.
    pub fn show(&self, rev: &str) -> Result<String, GitError> {
        self.git(&["show", rev])
    }

    /// Diff the working tree against the index (`cached` = false) or the
    /// index against HEAD (`cached` = true), restricted to `paths`.
    pub fn diff(&self, cached: bool, paths: &[PathBuf]) -> Result<String, GitError> {
        let mut args: Vec<String> = vec!["diff".to_owned(), "--no-ext-diff".to_owned()];
        if cached {
            args.push("--cached".to_owned());
        }
        args.push("--".to_owned());
        for path in paths {
            args.push(path.to_string_lossy().into_owned());
        }
        self.git(&args)
    }

    /// Resolve `rev` to a full commit hash, failing when it does not name a
    /// commit.
    pub fn resolve_commit(&self, rev: &str) -> Result<String, GitError> {
        let revspec = format!("{rev}^{{commit}}");
        let out = self.git(&["rev-parse", "--verify", &revspec])?;
        Ok(out.trim().to_owned())
    }
}

// ---------------------------------------------------------------------------
// Read-only queries (bare repositories accepted)
// ---------------------------------------------------------------------------

/// Whether `path` lies inside a git working tree.
pub fn is_inside_work_tree(path: &Path) -> bool {
    git_says_true(path, &["rev-parse", "--is-inside-work-tree"])
}

/// Whether `path` is a bare repository.
pub fn is_bare_repository(path: &Path) -> bool {
    git_says_true(path, &["rev-parse", "--is-bare-repository"])
}

/// The current branch name (`HEAD` when detached).
pub fn current_branch(path: &Path) -> Result<String, GitError> {
    let out = git_stdout(path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(out.trim().to_owned())
}

/// The fetch URL of `remote`.
pub fn remote_url(path: &Path, remote: &str) -> Result<String, GitError> {
    let out = git_stdout(path, &["remote", "get-url", remote])?;
    Ok(out.trim().to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_error_display_command() {
        let err = GitError::Command {
            command: "git status --porcelain=v1".to_owned(),
            stderr: "fatal: not a git repository".to_owned(),
            exit_code: Some(128),
        };
        let msg = format!("{err}");
        assert!(msg.contains("git status --porcelain=v1"));
        assert!(msg.contains("exit code 128"));
        assert!(msg.contains("fatal: not a git repository"));
    }

    #[test]
    fn git_error_display_empty_stderr() {
        let err = GitError::Command {
            command: "git diff".to_owned(),
            stderr: String::new(),
            exit_code: Some(1),
        };
        let msg = format!("{err}");
        assert!(msg.ends_with("(exit code 1)"), "got: {msg}");
    }

    #[test]
    fn stash_ref_name() {
        let stash = StashRef {
            index: 2,
            summary: "stash@{2}: WIP on main: deadbee msg".to_owned(),
        };
        assert_eq!(stash.name(), "stash@{2}");
    }
}

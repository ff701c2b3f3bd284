//! The `check` subcommand: the repo health guard as a standalone command.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use crate::error::VaultError;
use crate::format::OutputFormat;
use crate::guard;
use crate::repo::WorkTree;

/// Check whether the repository can be safely snapshotted
///
/// Fails (exit code 1) when any conflict-pair status is present — the state
/// an interrupted stash pop, cherry-pick, or merge leaves behind. A patch
/// diffed from such a tree could not be cleanly reapplied, so collection
/// refuses to run until the conflicts are resolved.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository working tree (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct CheckEnvelope {
    repo: String,
    blocked: bool,
    conflicts: Vec<ConflictOut>,
}

#[derive(Serialize)]
struct ConflictOut {
    path: String,
    kind: String,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let start = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let tree = WorkTree::open(&start)?;
    let format = OutputFormat::resolve(args.format);

    match guard::check(&tree) {
        Ok(()) => {
            match format {
                OutputFormat::Json => {
                    let envelope = CheckEnvelope {
                        repo: tree.root().display().to_string(),
                        blocked: false,
                        conflicts: vec![],
                    };
                    println!("{}", OutputFormat::Json.serialize(&envelope)?);
                }
                OutputFormat::Text => println!("[OK] repository is collectable"),
            }
            Ok(())
        }
        Err(VaultError::RepoBlocked { conflicts }) => {
            match format {
                OutputFormat::Json => {
                    let envelope = CheckEnvelope {
                        repo: tree.root().display().to_string(),
                        blocked: true,
                        conflicts: conflicts
                            .iter()
                            .map(|c| ConflictOut {
                                path: rel(tree.root(), &c.path),
                                kind: c.description.clone(),
                            })
                            .collect(),
                    };
                    println!("{}", OutputFormat::Json.serialize(&envelope)?);
                }
                OutputFormat::Text => {
                    println!("[FAIL] {}", VaultError::RepoBlocked { conflicts });
                }
            }
            bail!("repository is blocked");
        }
        Err(other) => Err(other.into()),
    }
}

fn rel(repo_root: &Path, path: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

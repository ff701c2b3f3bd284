//! The `collect` subcommand: orchestrated patch collection.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{ArgGroup, Args};

use crate::collect::{collect, CollectRequest};
use crate::config::VaultConfig;
use crate::filter::{FilterMode, PathFilter};
use crate::repo::WorkTree;
use crate::store::PatchStore;

/// Collect patches from a working tree into the vault
///
/// Runs the health guard first, then the requested steps in fixed order:
/// head, staged, unversioned, stash, previous. Artifacts land under the
/// vault root, namespaced by the repository's absolute path, and existing
/// artifacts are never overwritten.
///
/// Examples:
///   patchvault collect --head --staged --vault ~/patches
///   patchvault collect --unversioned --exclude '*/target/*'
///   patchvault collect --stash 2 --previous 3 --best-effort
#[derive(Args, Debug)]
#[command(group = ArgGroup::new("steps").required(true).multiple(true))]
#[allow(clippy::struct_excessive_bools)]
pub struct CollectArgs {
    /// Repository working tree (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Vault root (overrides `[vault] root` in .patchvault.toml)
    #[arg(long, value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Collect unstaged changes into head.patch
    #[arg(long, group = "steps")]
    pub head: bool,

    /// Collect staged changes into staged.patch
    #[arg(long, group = "steps")]
    pub staged: bool,

    /// Copy untracked files under unversioned/
    #[arg(long, group = "steps")]
    pub unversioned: bool,

    /// Collect up to N stash entries, newest first (omit N for the
    /// configured default; negative means all)
    #[arg(long, group = "steps", value_name = "N", num_args = 0..=1, allow_negative_numbers = true)]
    pub stash: Option<Option<i64>>,

    /// Collect the last N commits (omit N for the configured default)
    #[arg(long, group = "steps", value_name = "N", num_args = 0..=1)]
    pub previous: Option<Option<usize>>,

    /// Filter mode: include or exclude
    #[arg(long, default_value = "include")]
    pub mode: FilterMode,

    /// Deny-list glob consulted only in exclude mode (may repeat)
    #[arg(long = "include", value_name = "GLOB")]
    pub include_patterns: Vec<String>,

    /// Deny-list glob always applied (may repeat)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude_patterns: Vec<String>,

    /// Keep going after a step fails and report all errors at the end
    #[arg(long)]
    pub best_effort: bool,
}

pub fn run(args: &CollectArgs) -> Result<()> {
    let start = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let tree = WorkTree::open(&start)?;
    let config = VaultConfig::load(tree.root())?;

    let vault_root = args
        .vault
        .clone()
        .or_else(|| config.vault.root.clone())
        .ok_or_else(|| {
            anyhow!(
                "no vault root configured.\n  To fix: pass --vault <DIR> or set [vault] root in .patchvault.toml"
            )
        })?;
    std::fs::create_dir_all(&vault_root)?;
    let store = PatchStore::open(&vault_root)?;

    let filter = PathFilter::new(args.mode, &args.include_patterns, &args.exclude_patterns)?;

    let request = CollectRequest {
        head: args.head,
        staged: args.staged,
        unversioned: args.unversioned,
        stash: args
            .stash
            .map(|count| count.unwrap_or(config.collect.stash_count)),
        previous: args
            .previous
            .map(|count| count.unwrap_or(config.collect.previous_count)),
        best_effort: args.best_effort || config.collect.best_effort,
        filter,
    };

    let outcome = collect(&tree, &store, &request)?;

    let repo_dir = store.repo_dir(tree.root());
    println!(
        "collected {} artifact(s) into {}",
        outcome.artifacts.len(),
        repo_dir.display()
    );
    for artifact in &outcome.artifacts {
        let shown = artifact.path.strip_prefix(&repo_dir).unwrap_or(&artifact.path);
        println!("  - {}", shown.display());
    }

    if !outcome.is_success() {
        eprintln!("{} step(s) failed:", outcome.failures.len());
        for failure in &outcome.failures {
            eprintln!("  - {failure}");
        }
        bail!("collection finished with failures");
    }
    Ok(())
}

//! The `pick` subcommand: snapshot one historical commit by revision.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use crate::collect::collect_pick;
use crate::config::VaultConfig;
use crate::repo::WorkTree;
use crate::store::PatchStore;

/// Collect the change introduced by a single commit
///
/// The revision may be anything `git rev-parse` accepts (full or short
/// hash, branch, `HEAD~2`); it is resolved to a full hash first, and the
/// artifact is named `pick_<hash>.patch`. The commit does not need to be
/// an ancestor of the current HEAD position.
#[derive(Args, Debug)]
pub struct PickArgs {
    /// The revision to snapshot
    pub rev: String,

    /// Repository working tree (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Vault root (overrides `[vault] root` in .patchvault.toml)
    #[arg(long, value_name = "DIR")]
    pub vault: Option<PathBuf>,
}

pub fn run(args: &PickArgs) -> Result<()> {
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

    let artifact = collect_pick(&tree, &store, &args.rev)?;
    println!("collected {}", artifact.path.display());
    Ok(())
}

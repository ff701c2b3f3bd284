//! The `status` subcommand: classified working-tree status.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::classify::{StatusReport, ALL_CATEGORIES};
use crate::format::OutputFormat;
use crate::repo::WorkTree;

/// Show the classified status of a working tree
///
/// Every porcelain status code is mapped to exactly one category, including
/// the conflict pairs an interrupted stash pop leaves behind. Unrecognized
/// codes are an error, never silently dropped.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Repository working tree (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Do not count untracked files against cleanliness
    #[arg(long)]
    pub ignore_untracked: bool,

    /// Output format: text, json
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct StatusEnvelope {
    repo: String,
    clear: bool,
    blocked: bool,
    categories: Vec<CategoryOut>,
}

#[derive(Serialize)]
struct CategoryOut {
    category: String,
    paths: Vec<String>,
}

pub fn run(args: &StatusArgs) -> Result<()> {
    let start = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let tree = WorkTree::open(&start)?;
    let report = tree.status()?;

    match OutputFormat::resolve(args.format) {
        OutputFormat::Json => {
            let envelope = envelope(tree.root(), &report, args.ignore_untracked);
            println!("{}", OutputFormat::Json.serialize(&envelope)?);
        }
        OutputFormat::Text => {
            print!("{}", render_text(tree.root(), &report, args.ignore_untracked));
        }
    }
    Ok(())
}

fn envelope(repo_root: &Path, report: &StatusReport, ignore_untracked: bool) -> StatusEnvelope {
    let categories = ALL_CATEGORIES
        .into_iter()
        .filter_map(|category| {
            let entries = report.of(category);
            if entries.is_empty() {
                return None;
            }
            Some(CategoryOut {
                category: category.to_string(),
                paths: entries
                    .iter()
                    .map(|e| rel(repo_root, &e.path).display().to_string())
                    .collect(),
            })
        })
        .collect();

    StatusEnvelope {
        repo: repo_root.display().to_string(),
        clear: report.is_clear(ignore_untracked),
        blocked: !report.conflicts().is_empty(),
        categories,
    }
}

fn render_text(repo_root: &Path, report: &StatusReport, ignore_untracked: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== patchvault status: {} ===", repo_root.display());

    if report.is_clear(ignore_untracked) {
        out.push_str("[OK] working tree clear\n");
        return out;
    }

    for category in ALL_CATEGORIES {
        let entries = report.of(category);
        if entries.is_empty() {
            continue;
        }
        let marker = if category.is_conflict() { "[FAIL]" } else { "[WARN]" };
        let _ = writeln!(out, "{marker} {category}: {}", entries.len());
        for entry in entries {
            match &entry.orig_path {
                Some(orig) => {
                    let _ = writeln!(
                        out,
                        "  - {} (from {})",
                        rel(repo_root, &entry.path).display(),
                        rel(repo_root, orig).display()
                    );
                }
                None => {
                    let _ = writeln!(out, "  - {}", rel(repo_root, &entry.path).display());
                }
            }
        }
    }
    out
}

/// Display paths relative to the repo root where possible.
fn rel<'a>(repo_root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(repo_root).unwrap_or(path)
}

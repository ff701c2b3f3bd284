use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use patchvault::cmd::{check, collect, pick, status};
use patchvault::telemetry;

/// Working-tree status classifier and patch vault
///
/// patchvault reads a git working tree through the installed `git` binary,
/// classifies every file's porcelain status — including the conflict-pair
/// states an interrupted `stash pop` leaves behind — and snapshots
/// uncommitted or historical changes into a collision-safe vault.
///
/// Artifacts are namespaced by the repository's absolute path and are never
/// overwritten: re-collecting fails until the previous artifact is consumed
/// or cleared deliberately.
///
/// QUICK START:
///
///   # what state is the tree in?
///   patchvault status
///
///   # snapshot unstaged + staged changes
///   patchvault collect --head --staged --vault ~/patches
///
///   # copy untracked files, skipping build output
///   patchvault collect --unversioned --exclude '*/target/*' --vault ~/patches
#[derive(Parser)]
#[command(name = "patchvault")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(
    after_help = "See 'patchvault <command> --help' for more information on a specific command."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show classified working-tree status
    Status(status::StatusArgs),

    /// Check whether the repository can be safely snapshotted
    Check(check::CheckArgs),

    /// Collect patches into the vault
    Collect(collect::CollectArgs),

    /// Collect a single historical commit by revision
    Pick(pick::PickArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Status(ref args) => status::run(args),
        Commands::Check(ref args) => check::run(args),
        Commands::Collect(ref args) => collect::run(args),
        Commands::Pick(ref args) => pick::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "patchvault",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

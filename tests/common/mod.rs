//! Shared test helpers for patchvault integration tests.
//!
//! All tests run against throwaway git repositories in temp directories —
//! no side effects on the real environment. Each test gets its own repo via
//! `setup_git_repo()` or `setup_three_file_repo()`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Create a fresh git repo in a temp directory, configured so commits
/// succeed without a global git config.
pub fn setup_git_repo() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    git(dir.path(), &["init", "-b", "main"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

/// A repo with `file1.txt`, `file2.txt`, `file3.txt` committed.
pub fn setup_three_file_repo() -> TempDir {
    let dir = setup_git_repo();
    for name in ["file1.txt", "file2.txt", "file3.txt"] {
        write_file(dir.path(), name, &format!("{name} original\n"));
    }
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "initial files"]);
    dir
}

/// Leave `more1.txt` in an `AA` (added/added) conflict state, the shape a
/// failed stash pop or merge leaves behind: both sides add the same file
/// with different content, then the merge fails.
pub fn provoke_added_added_conflict(repo: &Path, name: &str) {
    git(repo, &["checkout", "-b", "feature"]);
    write_file(repo, name, "feature side\n");
    git(repo, &["add", name]);
    git(repo, &["commit", "-m", "add on feature"]);

    git(repo, &["checkout", "main"]);
    write_file(repo, name, "main side\n");
    git(repo, &["add", name]);
    git(repo, &["commit", "-m", "add on main"]);

    let out = git_out(repo, &["merge", "feature"]);
    assert!(!out.status.success(), "merge should conflict");
}

/// Leave `file1.txt` in a `UU` (updated/updated) conflict via an actual
/// failed `git stash pop`.
pub fn provoke_stash_pop_conflict(repo: &Path) {
    write_file(repo, "file1.txt", "stashed change\n");
    git(repo, &["stash", "push"]);

    write_file(repo, "file1.txt", "committed change\n");
    git(repo, &["add", "file1.txt"]);
    git(repo, &["commit", "-m", "conflicting commit"]);

    let out = git_out(repo, &["stash", "pop"]);
    assert!(!out.status.success(), "stash pop should conflict");
}

/// Run git in `dir`, panicking on failure. Returns stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = git_out(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "git {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Run git in `dir` without asserting success.
pub fn git_out(dir: &Path, args: &[&str]) -> Output {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {}: {e}", args.join(" ")))
}

/// Write a file under the repo, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
}

/// Run the patchvault binary with the given args in the given directory.
pub fn patchvault(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_patchvault"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to execute patchvault")
}

/// Run patchvault and assert it succeeds. Returns stdout.
pub fn patchvault_ok(dir: &Path, args: &[&str]) -> String {
    let out = patchvault(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "patchvault {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Run patchvault and assert it fails. Returns (stdout, stderr).
pub fn patchvault_fails(dir: &Path, args: &[&str]) -> (String, String) {
    let out = patchvault(dir, args);
    assert!(
        !out.status.success(),
        "Expected patchvault {} to fail, but it succeeded.\nstdout: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout),
    );
    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
    )
}

/// Recursively find files named `name` under `root`.
pub fn find_files(root: &Path, name: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(find_files(&path, name));
        } else if path.file_name().is_some_and(|n| n == name) {
            found.push(path);
        }
    }
    found
}

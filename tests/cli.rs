//! End-to-end tests driving the patchvault binary.

mod common;
use common::*;

use tempfile::TempDir;

#[test]
fn status_on_clean_repo_reports_clear() {
    let repo = setup_three_file_repo();
    let stdout = patchvault_ok(repo.path(), &["status"]);
    assert!(stdout.contains("[OK] working tree clear"), "got: {stdout}");
}

#[test]
fn status_text_lists_categories() {
    let repo = setup_three_file_repo();
    write_file(repo.path(), "file1.txt", "changed\n");
    write_file(repo.path(), "scratch.txt", "wip\n");

    let stdout = patchvault_ok(repo.path(), &["status"]);
    assert!(stdout.contains("modified: 1"), "got: {stdout}");
    assert!(stdout.contains("file1.txt"), "got: {stdout}");
    assert!(stdout.contains("unversioned: 1"), "got: {stdout}");
    assert!(stdout.contains("scratch.txt"), "got: {stdout}");
}

#[test]
fn status_json_is_valid_and_structured() {
    let repo = setup_three_file_repo();
    write_file(repo.path(), "file1.txt", "changed\n");

    let stdout = patchvault_ok(repo.path(), &["status", "--format=json"]);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status --format=json should produce valid JSON");

    assert_eq!(parsed.get("clear").and_then(serde_json::Value::as_bool), Some(false));
    assert_eq!(parsed.get("blocked").and_then(serde_json::Value::as_bool), Some(false));
    let categories = parsed
        .get("categories")
        .and_then(serde_json::Value::as_array)
        .expect("categories array");
    assert_eq!(categories.len(), 1);
    assert_eq!(
        categories[0].get("category").and_then(serde_json::Value::as_str),
        Some("modified")
    );
}

#[test]
fn check_passes_on_ordinary_changes() {
    let repo = setup_three_file_repo();
    write_file(repo.path(), "file1.txt", "changed\n");

    let stdout = patchvault_ok(repo.path(), &["check"]);
    assert!(stdout.contains("[OK] repository is collectable"), "got: {stdout}");
}

#[test]
fn check_fails_on_conflicted_repo_naming_the_file() {
    let repo = setup_three_file_repo();
    provoke_added_added_conflict(repo.path(), "more1.txt");

    let (stdout, _stderr) = patchvault_fails(repo.path(), &["check"]);
    assert!(stdout.contains("more1.txt"), "got: {stdout}");
    assert!(stdout.contains("added/added"), "got: {stdout}");
}

#[test]
fn check_json_reports_blocked_state() {
    let repo = setup_three_file_repo();
    provoke_stash_pop_conflict(repo.path());

    let (stdout, _stderr) = patchvault_fails(repo.path(), &["check", "--format=json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed.get("blocked").and_then(serde_json::Value::as_bool), Some(true));
    let conflicts = parsed
        .get("conflicts")
        .and_then(serde_json::Value::as_array)
        .expect("conflicts array");
    assert_eq!(conflicts.len(), 1);
    assert_eq!(
        conflicts[0].get("path").and_then(serde_json::Value::as_str),
        Some("file1.txt")
    );
    assert_eq!(
        conflicts[0].get("kind").and_then(serde_json::Value::as_str),
        Some("updated/updated")
    );
}

#[test]
fn collect_writes_into_the_vault() {
    let repo = setup_three_file_repo();
    let vault = TempDir::new().unwrap();
    write_file(repo.path(), "file1.txt", "changed\n");

    let stdout = patchvault_ok(
        repo.path(),
        &["collect", "--head", "--vault", vault.path().to_str().unwrap()],
    );
    assert!(stdout.contains("collected 1 artifact(s)"), "got: {stdout}");
    assert!(stdout.contains("head.patch"), "got: {stdout}");

    let patches = find_files(vault.path(), "head.patch");
    assert_eq!(patches.len(), 1);
    let text = std::fs::read_to_string(&patches[0]).unwrap();
    assert!(text.contains("file1.txt"), "patch:\n{text}");
}

#[test]
fn collect_requires_at_least_one_step() {
    let repo = setup_three_file_repo();
    let vault = TempDir::new().unwrap();
    let (_stdout, stderr) = patchvault_fails(
        repo.path(),
        &["collect", "--vault", vault.path().to_str().unwrap()],
    );
    assert!(!stderr.is_empty());
}

#[test]
fn collect_without_a_vault_root_explains_the_fix() {
    let repo = setup_three_file_repo();
    write_file(repo.path(), "file1.txt", "changed\n");

    let (_stdout, stderr) = patchvault_fails(repo.path(), &["collect", "--head"]);
    assert!(stderr.contains("no vault root configured"), "got: {stderr}");
    assert!(stderr.contains(".patchvault.toml"), "got: {stderr}");
}

#[test]
fn collect_reads_vault_root_from_config() {
    let repo = setup_three_file_repo();
    let vault = TempDir::new().unwrap();
    write_file(repo.path(), "file1.txt", "changed\n");
    write_file(
        repo.path(),
        ".patchvault.toml",
        &format!("[vault]\nroot = \"{}\"\n", vault.path().display()),
    );

    patchvault_ok(repo.path(), &["collect", "--head"]);
    assert_eq!(find_files(vault.path(), "head.patch").len(), 1);
}

#[test]
fn collect_on_blocked_repo_exits_nonzero() {
    let repo = setup_three_file_repo();
    let vault = TempDir::new().unwrap();
    provoke_added_added_conflict(repo.path(), "more1.txt");

    let (_stdout, stderr) = patchvault_fails(
        repo.path(),
        &[
            "collect",
            "--head",
            "--best-effort",
            "--vault",
            vault.path().to_str().unwrap(),
        ],
    );
    assert!(stderr.contains("more1.txt"), "got: {stderr}");
    assert_eq!(find_files(vault.path(), "head.patch").len(), 0);
}

#[test]
fn collect_best_effort_reports_failures_and_exits_nonzero() {
    let repo = setup_three_file_repo();
    let vault = TempDir::new().unwrap();
    write_file(repo.path(), "file1.txt", "changed\n");

    let (stdout, stderr) = patchvault_fails(
        repo.path(),
        &[
            "collect",
            "--head",
            "--staged",
            "--best-effort",
            "--vault",
            vault.path().to_str().unwrap(),
        ],
    );
    assert!(stdout.contains("head.patch"), "got: {stdout}");
    assert!(stderr.contains("staged"), "got: {stderr}");
    assert_eq!(find_files(vault.path(), "head.patch").len(), 1);
}

#[test]
fn pick_collects_a_historical_commit() {
    let repo = setup_three_file_repo();
    let vault = TempDir::new().unwrap();

    let stdout = patchvault_ok(
        repo.path(),
        &["pick", "HEAD", "--vault", vault.path().to_str().unwrap()],
    );
    assert!(stdout.contains("collected"), "got: {stdout}");

    let hash = git(repo.path(), &["rev-parse", "HEAD"]).trim().to_string();
    assert_eq!(find_files(vault.path(), &format!("pick_{hash}.patch")).len(), 1);
}

#[test]
fn completions_emit_a_script() {
    let repo = setup_three_file_repo();
    let stdout = patchvault_ok(repo.path(), &["completions", "bash"]);
    assert!(stdout.contains("patchvault"), "got: {stdout}");
}

#[test]
fn status_on_non_repo_fails_with_guidance() {
    let dir = TempDir::new().unwrap();
    let (_stdout, stderr) = patchvault_fails(dir.path(), &["status"]);
    assert!(stderr.contains("not a git working tree"), "got: {stderr}");
}

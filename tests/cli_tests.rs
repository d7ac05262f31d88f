//! CLI integration tests using the REAL skillsync binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn skillsync_cmd() -> Command {
    Command::cargo_bin("skillsync").expect("skillsync binary")
}

#[test]
fn test_help_output() {
    skillsync_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("skills folder"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("enable"))
        .stdout(predicate::str::contains("reconcile"));
}

#[test]
fn test_version_output() {
    skillsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillsync"));
}

#[test]
fn test_completions_bash() {
    skillsync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skillsync"));
}

#[test]
fn test_completions_unknown_shell() {
    skillsync_cmd().args(["completions", "tcsh"]).assert().failure();
}

#[test]
fn test_sources_empty() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sources registered."));
}

#[test]
fn test_sources_json_empty() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["sources", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_list_without_sources() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sources registered"));
}

#[test]
fn test_add_invalid_reference() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["add", "not a repository"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository reference"))
        .stderr(predicate::str::contains("https://github.com/owner/repo"));
}

#[test]
fn test_add_tree_url_without_path() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["add", "--no-sync", "https://github.com/owner/repo/tree/main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository reference"));
}

#[test]
fn test_add_tree_url_with_parent_segments() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["add", "--no-sync", "https://github.com/owner/repo/tree/main/../../secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository reference"));
}

#[test]
fn test_add_remote_without_sync_registers() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["add", "--no-sync", "https://github.com/owner/repo/tree/main/skills"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added source"));

    workspace
        .cmd()
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://github.com/owner/repo@main:skills"))
        .stdout(predicate::str::contains("never"));

    workspace
        .cmd()
        .args(["add", "--no-sync", "https://github.com/owner/repo/tree/main/skills"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already registered"));
}

#[test]
fn test_enable_unknown_skill() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["enable", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Skill 'does-not-exist' not found"));
}

#[test]
fn test_remove_unknown_source() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["remove", "0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_sync_without_sources() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sources registered."));
}

#[test]
fn test_reconcile_empty_destination() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .arg("reconcile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifest is up to date."));
}

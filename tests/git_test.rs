#![cfg(unix)]

use std::fs;
use tempfile::TempDir;
use gradle_migrator::utils::git::{add_files_to_git, find_git_path, git_status, unstage_files};
use gradle_migrator::utils::shell::{DEFAULT_SHELL, execute};

/// Creates a git repository holding a generated catalog, or `None` without git
fn setup_repository() -> Option<TempDir> {
    if find_git_path().is_err() {
        return None;
    }
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_string_lossy().to_string();
    let output = execute(DEFAULT_SHELL, &path, "git init -q").unwrap();
    assert!(!output.contains("Exit code:"), "git init failed: {}", output);
    fs::write(temp_dir.path().join("libs.versions.toml"), "[versions]\n").unwrap();
    Some(temp_dir)
}

/// Tests staging and unstaging of migrated files.
///
/// This test verifies that:
/// 1. Added files show up in `git status`
/// 2. Unstaging reports command failures in the output instead of failing
#[test]
fn test_stage_migrated_files() {
    let Some(temp_dir) = setup_repository() else {
        return;
    };
    let path = temp_dir.path().to_string_lossy().to_string();
    let files = vec!["libs.versions.toml".to_string()];

    add_files_to_git(&files, DEFAULT_SHELL, &path).unwrap();
    let status = git_status(DEFAULT_SHELL, &path).unwrap();
    assert!(status.contains("libs.versions.toml"));

    assert!(unstage_files(&files, DEFAULT_SHELL, &path).is_ok());
}

/// Tests that git commands in a missing directory fail before running.
#[test]
fn test_git_in_missing_directory() {
    let files = vec!["libs.versions.toml".to_string()];
    let err = add_files_to_git(&files, DEFAULT_SHELL, "/definitely/not/here").unwrap_err();
    assert!(err.contains("does not exist"));
}

/// Tests staging a file whose path contains a space.
#[test]
fn test_stage_path_with_space() {
    let Some(temp_dir) = setup_repository() else {
        return;
    };
    let path = temp_dir.path().to_string_lossy().to_string();
    fs::create_dir_all(temp_dir.path().join("build logic")).unwrap();
    fs::write(
        temp_dir.path().join("build logic/libs.versions.toml"),
        "[versions]\n",
    )
    .unwrap();
    let files = vec!["build logic/libs.versions.toml".to_string()];

    add_files_to_git(&files, DEFAULT_SHELL, &path).unwrap();
    let status = git_status(DEFAULT_SHELL, &path).unwrap();
    assert!(status.contains("build logic/libs.versions.toml"));
}

use crate::error::{Error, Result};
use crate::utils::shell;
use log::{info, warn};
use semver::Version;
use std::path::PathBuf;
use std::process::Command;

/// Minimum git version, `git restore --staged` needs at least this
const MIN_GIT_VERSION: &str = "2.23.0";

const ADD_COMMAND_PREFIX: &str = "git -c credential.helper= -c core.quotepath=false -c log.showSignature=false add --ignore-errors -A -f -- ";

const UNSTAGE_COMMAND_PREFIX: &str = "git -c credential.helper= restore --staged ";

/// Helper function to find the git executable
pub fn find_git_path() -> Result<PathBuf> {
    which::which("git").map_err(|e| {
        Error::GitCommand(format!(
            "The 'git' command is not available. Please install git and ensure it's in your PATH. Error: {}",
            e
        ))
    })
}

/// Gets the installed git version
pub fn get_git_version() -> Result<Version> {
    let git_path = find_git_path()?;

    let output = Command::new(&git_path)
        .arg("--version")
        .output()
        .map_err(|e| Error::GitCommand(format!("Failed to execute git --version: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitCommand(format!(
            "Failed to get git version: {}",
            stderr
        )));
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    log::debug!("Raw git version output: {}", version_output);
    parse_git_version(&version_output)
}

/// Parses `git --version` output such as `git version 2.39.3 (Apple Git-146)`
/// or `git version 2.43.0.windows.1`
pub fn parse_git_version(output: &str) -> Result<Version> {
    let raw = output
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| Error::GitCommand(format!("Unexpected git version format: '{}'", output)))?;

    let numeric: Vec<&str> = raw
        .split('.')
        .take_while(|part| part.chars().all(|c| c.is_ascii_digit()) && !part.is_empty())
        .take(3)
        .collect();
    if numeric.is_empty() {
        return Err(Error::GitCommand(format!(
            "Unexpected git version format: '{}'",
            output
        )));
    }

    let mut normalized = numeric.join(".");
    for _ in numeric.len()..3 {
        normalized.push_str(".0");
    }

    Version::parse(&normalized)
        .map_err(|e| Error::GitCommand(format!("Failed to parse git version '{}': {}", raw, e)))
}

/// Ensures git is installed and recent enough
pub fn check_git_requirements() -> Result<()> {
    let current_version = get_git_version()?;

    let min_version = Version::parse(MIN_GIT_VERSION)
        .map_err(|e| Error::GitCommand(format!("Failed to parse minimum version: {}", e)))?;

    if current_version < min_version {
        return Err(Error::GitCommand(format!(
            "git version {} or higher is required. Found version {}",
            MIN_GIT_VERSION, current_version
        )));
    }

    Ok(())
}

/// Adds a single file to the git index and returns the command output
pub fn add_file_to_git(file: &str, shell_path: &str, execution_path: &str) -> Result<String> {
    let command = format!("{}{}", ADD_COMMAND_PREFIX, shell::quote(file));
    info!("Executing command: {}", command);
    shell::execute(shell_path, execution_path, &command)
}

/// Adds every file to the git index, logging the output of each command
pub fn add_files_to_git(files: &[String], shell_path: &str, execution_path: &str) -> Result<()> {
    for file in files {
        let output = add_file_to_git(file, shell_path, execution_path)?;
        log_output(file, &output);
    }
    Ok(())
}

/// Removes files from the git staging area
#[allow(dead_code)]
pub fn unstage_files(files: &[String], shell_path: &str, execution_path: &str) -> Result<()> {
    for file in files {
        let command = format!("{}{}", UNSTAGE_COMMAND_PREFIX, shell::quote(file));
        info!("Unstaging file with command: {}", command);
        let output = shell::execute(shell_path, execution_path, &command)?;
        log_output(file, &output);
    }
    Ok(())
}

/// Runs `git status` in the execution path
#[allow(dead_code)]
pub fn git_status(shell_path: &str, execution_path: &str) -> Result<String> {
    info!("Executing command: git status");
    let output = shell::execute(shell_path, execution_path, "git status")?;
    info!("output of command: {}", output);
    Ok(output)
}

fn log_output(file: &str, output: &str) {
    if output.contains("Exit code:") {
        warn!("git reported a failure for {}: {}", file, output.trim_end());
    } else {
        info!("output of command: {}", output);
    }
}

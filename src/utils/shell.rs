use crate::error::{Error, Result};
use log::debug;
use std::path::PathBuf;
use std::process::Command;

/// Default shell used to run version control commands
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Executes `command` with `<shell> -c` inside `execution_path`.
///
/// A `~` in the execution path is replaced with the home directory. The
/// captured standard output is returned line by line, each line terminated by
/// `\n`. When the process exits unsuccessfully an `Exit code: N` line is
/// appended instead of failing.
pub fn execute(shell_path: &str, execution_path: &str, command: &str) -> Result<String> {
    let directory = expand_home(execution_path)?;
    if !directory.is_dir() {
        return Err(Error::ShellCommand(format!(
            "Execution directory does not exist: {}",
            directory.display()
        )));
    }

    debug!(
        "Executing '{}' with {} in {}",
        command,
        shell_path,
        directory.display()
    );
    let output = Command::new(shell_path)
        .arg("-c")
        .arg(command)
        .current_dir(&directory)
        .output()
        .map_err(|e| Error::ShellCommand(format!("Failed to execute '{}': {}", command, e)))?;

    let mut captured = String::new();
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        captured.push_str(line);
        captured.push('\n');
    }

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        captured.push_str(&format!("Exit code: {}\n", code));
    }

    Ok(captured)
}

/// Wraps an argument in single quotes for `sh -c`, escaping embedded quotes
pub fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

fn expand_home(path: &str) -> Result<PathBuf> {
    if !path.contains('~') {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| Error::ShellCommand("Unable to determine home directory".to_string()))?;
    Ok(PathBuf::from(path.replace('~', &home.to_string_lossy())))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_execute_captures_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().to_string();
        let output = execute(DEFAULT_SHELL, &path, "echo first; echo second").unwrap();
        assert_eq!(output, "first\nsecond\n");
    }

    #[test]
    fn test_execute_runs_in_execution_path() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("marker.txt"), "").unwrap();
        let path = temp_dir.path().to_string_lossy().to_string();
        let output = execute(DEFAULT_SHELL, &path, "ls").unwrap();
        assert!(output.contains("marker.txt"));
    }

    #[test]
    fn test_execute_appends_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().to_string();
        let output = execute(DEFAULT_SHELL, &path, "echo failing; exit 3").unwrap();
        assert_eq!(output, "failing\nExit code: 3\n");
    }

    #[test]
    fn test_quoted_argument_stays_one_word() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().to_string();
        let command = format!("printf '%s\\n' {}", quote("build logic/it's.toml"));
        let output = execute(DEFAULT_SHELL, &path, &command).unwrap();
        assert_eq!(output, "build logic/it's.toml\n");
    }

    #[test]
    fn test_execute_missing_directory() {
        let result = execute(DEFAULT_SHELL, "/definitely/not/here", "echo hi");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("does not exist"));
    }
}

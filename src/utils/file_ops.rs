use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// State of a file before the migration touched it
#[derive(Debug, Clone)]
enum Snapshot {
    /// The file did not exist and must be removed on rollback
    Absent,
    /// The file existed with this content
    Content(Vec<u8>),
}

/// Tracks written files and restores them when a migration fails
pub struct FileTracker {
    /// Snapshots in the order files were first tracked
    snapshots: Vec<(PathBuf, Snapshot)>,
    /// Whether automatic restore on drop is enabled
    restore_enabled: bool,
    /// Whether to force rollback regardless of restore_enabled
    force_rollback: bool,
}

impl Default for FileTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTracker {
    /// Creates a new FileTracker with restore on drop enabled
    pub fn new() -> Self {
        Self::new_with_restore(true)
    }

    /// Creates a new FileTracker with restore on drop configurable
    pub fn new_with_restore(restore_enabled: bool) -> Self {
        Self {
            snapshots: Vec::new(),
            restore_enabled,
            force_rollback: false,
        }
    }

    /// Records the current state of a file before it gets modified
    pub fn track_file(&mut self, path: &Path) -> Result<()> {
        if self.is_tracked(path) {
            debug!("File already tracked: {}", path.display());
            return Ok(());
        }

        let snapshot = if path.exists() {
            let content = fs::read(path).map_err(|e| Error::FileOperation {
                path: path.to_path_buf(),
                message: format!("Failed to read file content: {}", e),
            })?;
            Snapshot::Content(content)
        } else {
            Snapshot::Absent
        };

        self.snapshots.push((path.to_path_buf(), snapshot));
        info!("Started tracking file: {}", path.display());
        Ok(())
    }

    /// Whether the path is already tracked
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.snapshots.iter().any(|(p, _)| p == path)
    }

    /// Paths of all tracked files, in tracking order
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.snapshots.iter().map(|(p, _)| p.clone()).collect()
    }

    /// Force rollback of tracked changes
    pub fn force_rollback(&mut self) {
        self.force_rollback = true;
    }

    /// Restores every tracked file, most recently tracked first
    pub fn rollback(&mut self) -> Result<()> {
        info!("Rolling back file changes...");

        for (path, snapshot) in self.snapshots.iter().rev() {
            match snapshot {
                Snapshot::Content(content) => {
                    fs::write(path, content).map_err(|e| Error::FileOperation {
                        path: path.clone(),
                        message: format!("Failed to restore file content: {}", e),
                    })?;
                    info!("Restored original content to {}", path.display());
                }
                Snapshot::Absent => {
                    if path.exists() {
                        fs::remove_file(path).map_err(|e| Error::FileOperation {
                            path: path.clone(),
                            message: format!("Failed to remove file: {}", e),
                        })?;
                        info!("Removed created file: {}", path.display());
                    }
                }
            }
        }

        self.snapshots.clear();
        info!("Rollback completed successfully");
        Ok(())
    }
}

impl Drop for FileTracker {
    fn drop(&mut self) {
        if self.force_rollback && self.restore_enabled && !self.snapshots.is_empty() {
            if let Err(e) = self.rollback() {
                warn!("Error during automatic rollback: {}", e);
            }
        }
    }
}

/// A guard wrapper around FileTracker that tracks files as they are written
pub struct FileTrackerGuard {
    inner: FileTracker,
}

impl Default for FileTrackerGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTrackerGuard {
    /// Creates a new FileTrackerGuard with restore on drop enabled
    pub fn new() -> Self {
        Self {
            inner: FileTracker::new(),
        }
    }

    /// Creates a new FileTrackerGuard with restore on drop configurable
    pub fn new_with_restore(restore_enabled: bool) -> Self {
        Self {
            inner: FileTracker::new_with_restore(restore_enabled),
        }
    }

    /// Starts tracking a file
    #[allow(dead_code)]
    pub fn track_file(&mut self, path: &Path) -> Result<()> {
        self.inner.track_file(path)
    }

    /// Tracks the file, then replaces its content
    pub fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.inner.track_file(path)?;
        fs::write(path, content).map_err(|e| Error::FileOperation {
            path: path.to_path_buf(),
            message: format!("Failed to write file: {}", e),
        })?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Paths of all tracked files, in tracking order
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.inner.tracked_paths()
    }

    /// Force rollback of tracked changes
    pub fn force_rollback(&mut self) {
        self.inner.force_rollback();
    }
}

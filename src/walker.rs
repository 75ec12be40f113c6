//! Lazy enumeration of candidate workflow files
//!
//! Entries are visited in name order within each directory. Directories
//! named `backups` are never entered, and symlinked directories are not
//! followed.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::config::SKIPPED_DIR_NAME;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Iterator over files under a root directory whose extension is accepted
pub struct WorkflowFiles {
    extensions: Vec<String>,
    recursive: bool,
    /// Directories still to be read (stack; the top is read next)
    pending_dirs: Vec<PathBuf>,
    /// Entries of the current directory, reversed so `pop` yields name order
    entries: Vec<PathBuf>,
}

impl WorkflowFiles {
    /// Start walking `root`
    ///
    /// `extensions` are matched without the leading dot, ignoring ASCII case.
    pub fn new(root: &Path, extensions: &[String], recursive: bool) -> Result<Self, WalkError> {
        if !root.exists() {
            return Err(WalkError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(WalkError::NotADirectory(root.to_path_buf()));
        }

        Ok(Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            recursive,
            pending_dirs: vec![root.to_path_buf()],
            entries: Vec::new(),
        })
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Read the next pending directory into `entries`; false when none are left
    fn read_next_dir(&mut self) -> bool {
        let Some(dir) = self.pending_dirs.pop() else {
            return false;
        };

        match fs::read_dir(&dir) {
            Ok(read_dir) => {
                let mut paths: Vec<PathBuf> = read_dir
                    .filter_map(|entry| {
                        entry
                            .inspect_err(|e| warn!("Failed to read entry in {}: {}", dir.display(), e))
                            .ok()
                    })
                    .map(|entry| entry.path())
                    .collect();
                paths.sort();
                paths.reverse();
                self.entries = paths;
            }
            Err(e) => warn!("Failed to read directory {}: {}", dir.display(), e),
        }
        true
    }
}

impl Iterator for WorkflowFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let Some(path) = self.entries.pop() else {
                if self.read_next_dir() {
                    continue;
                }
                return None;
            };

            let Ok(file_type) = fs::symlink_metadata(&path).map(|m| m.file_type()) else {
                continue;
            };

            if file_type.is_dir() {
                let skipped = path.file_name().is_some_and(|n| n == SKIPPED_DIR_NAME);
                if self.recursive && !skipped {
                    self.pending_dirs.push(path);
                }
                continue;
            }

            if path.is_file() && self.accepts(&path) {
                return Some(path);
            }
        }
    }
}

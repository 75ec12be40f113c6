//! Applies resolved updates to a single workflow file

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::backup_path;
use crate::parser::types::ResolvedUpdate;
use crate::update::edit::{LineChange, TextEdit, apply_edits, diff_lines, edits_for};
use crate::update::error::UpdateError;

/// What happened to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// No updates; the file was not opened for writing
    Unchanged,
    /// Dry run: the changes that would have been written
    Previewed { changes: Vec<LineChange> },
    /// The new content was written (after the backup, if requested)
    Written {
        changes: Vec<LineChange>,
        backup: Option<PathBuf>,
    },
}

/// Rewrites pinned references in a file
///
/// All updates for a file are applied to one in-memory buffer, which is then
/// written atomically; a failure at any step leaves the file untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUpdater {
    dry_run: bool,
    backup: bool,
}

impl FileUpdater {
    pub fn new(dry_run: bool, backup: bool) -> Self {
        Self { dry_run, backup }
    }

    /// Compute the updated content of `original` without touching the disk
    pub fn render(
        &self,
        path: &Path,
        original: &str,
        updates: &[ResolvedUpdate],
    ) -> Result<String, UpdateError> {
        let mut edits: Vec<TextEdit> = Vec::with_capacity(updates.len() * 2);

        for update in updates {
            let reference = &update.reference;
            let pinned = original.get(reference.hash_range.clone());
            if pinned != Some(reference.commit_hash.as_str()) {
                return Err(UpdateError::StaleReference {
                    path: path.to_path_buf(),
                    line: reference.line + 1,
                });
            }
            edits.extend(edits_for(update));
        }

        apply_edits(original, &edits).ok_or_else(|| UpdateError::StaleReference {
            path: path.to_path_buf(),
            line: updates.first().map_or(0, |u| u.reference.line + 1),
        })
    }

    /// Apply `updates` to the file at `path` whose current content is `original`
    pub fn apply(
        &self,
        path: &Path,
        original: &str,
        updates: &[ResolvedUpdate],
    ) -> Result<FileOutcome, UpdateError> {
        if updates.is_empty() {
            return Ok(FileOutcome::Unchanged);
        }

        let updated = self.render(path, original, updates)?;
        let changes = diff_lines(original, &updated);

        if self.dry_run {
            debug!("Dry run: not writing {}", path.display());
            return Ok(FileOutcome::Previewed { changes });
        }

        let backup = if self.backup {
            let backup = backup_path(path);
            atomic_write_like(&backup, original.as_bytes(), path).map_err(|source| {
                UpdateError::Backup {
                    path: backup.clone(),
                    source,
                }
            })?;
            info!("Backup created: {}", backup.display());
            Some(backup)
        } else {
            None
        };

        atomic_write(path, updated.as_bytes()).map_err(|source| UpdateError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Updated file: {}", path.display());

        Ok(FileOutcome::Written { changes, backup })
    }
}

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// An existing file keeps its permissions.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    atomic_write_like(path, data, path)
}

/// Like [`atomic_write`], but the result takes the permissions of `template`
/// when it exists.
pub fn atomic_write_like(path: &Path, data: &[u8], template: &Path) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    if let Ok(metadata) = std::fs::metadata(template) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

//! Update pipeline for a directory of workflow files
//!
//! ```text
//! WorkflowFiles ──▶ GitHubActionsParser ──▶ VersionResolver ──▶ FileUpdater
//!   (paths)          (ActionReference)       (ResolvedUpdate)     (rewrite)
//!                                                  │
//!                                                  ▼
//!                                             RunSummary
//! ```
//!
//! Files are processed one at a time and references within a file one at a
//! time. Only an invalid root path or a rejected token stops the run; every
//! other failure skips the affected reference or file and is counted.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::UpdaterConfig;
use crate::parser::GitHubActionsParser;
use crate::parser::types::{ActionReference, ResolvedUpdate};
use crate::summary::{RunSummary, SkipReason};
use crate::update::{FileOutcome, FileUpdater, UpdateError};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::resolver::{ResolveOptions, Resolution, VersionResolver};
use crate::walker::{WalkError, WorkflowFiles};

/// Errors that abort the whole run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Path(#[from] WalkError),

    #[error("GitHub rejected the token; check --github-token")]
    Unauthorized,
}

/// A file that has (or would have) been rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Result of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub summary: RunSummary,
    pub files: Vec<FileReport>,
}

/// Drives one update run over a directory tree
pub struct Runner<R: Registry> {
    config: UpdaterConfig,
    parser: GitHubActionsParser,
    resolver: VersionResolver<R>,
    updater: FileUpdater,
}

impl<R: Registry> Runner<R> {
    pub fn new(registry: R, config: UpdaterConfig) -> Self {
        let options = ResolveOptions {
            max_bump: config.max_bump,
            include_prereleases: config.include_prereleases,
        };

        Self {
            parser: GitHubActionsParser::new(),
            resolver: VersionResolver::new(registry, options),
            updater: FileUpdater::new(config.dry_run, config.backup),
            config,
        }
    }

    pub async fn run(&mut self) -> Result<RunReport, RunError> {
        let files = WorkflowFiles::new(
            &self.config.path,
            &self.config.extensions,
            self.config.recursive,
        )?;

        let mut report = RunReport::default();

        for path in files {
            debug!("Checking file: {}", path.display());
            report.summary.files_scanned += 1;

            if let Some(outcome) = self.process_file(&path, &mut report.summary).await? {
                report.files.push(FileReport { path, outcome });
            }
        }

        Ok(report)
    }

    /// Returns the outcome for a file that changed (or would change)
    async fn process_file(
        &mut self,
        path: &std::path::Path,
        summary: &mut RunSummary,
    ) -> Result<Option<FileOutcome>, RunError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                let e = UpdateError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                error!("{}", e);
                summary.files_failed += 1;
                return Ok(None);
            }
        };

        let references = self.parser.parse(path, &content);
        let mut updates = Vec::new();

        for reference in &references {
            summary.references_checked += 1;
            if let Some(update) = self.resolve(reference, summary).await? {
                updates.push(update);
            }
        }

        match self.updater.apply(path, &content, &updates) {
            Ok(FileOutcome::Unchanged) => Ok(None),
            Ok(outcome) => {
                summary.files_updated += 1;
                summary.references_updated += updates.len();
                Ok(Some(outcome))
            }
            Err(e) => {
                error!("{}", e);
                summary.files_failed += 1;
                summary.record_skips(SkipReason::WriteFailed, updates.len());
                Ok(None)
            }
        }
    }

    async fn resolve(
        &mut self,
        reference: &ActionReference,
        summary: &mut RunSummary,
    ) -> Result<Option<ResolvedUpdate>, RunError> {
        let location = format!(
            "{}:{}:{}",
            reference.path.display(),
            reference.line + 1,
            reference.column + 1
        );

        let resolution = match self.resolver.resolve(reference).await {
            Ok(resolution) => resolution,
            Err(RegistryError::Unauthorized) => return Err(RunError::Unauthorized),
            Err(e) => {
                let reason = match e {
                    RegistryError::NotFound(_) => SkipReason::NotFound,
                    RegistryError::RateLimited { .. } => SkipReason::RateLimited,
                    _ => SkipReason::Network,
                };
                warn!("Skipping {} ({}): {}", reference.label(), location, e);
                summary.record_skip(reason);
                return Ok(None);
            }
        };

        match resolution {
            Resolution::Update(update) => {
                info!(
                    "Found update for {} ({}): {} -> {}",
                    reference.identifier,
                    location,
                    reference.version.as_deref().unwrap_or("unknown"),
                    update.new_version
                );
                Ok(Some(update))
            }
            Resolution::UpToDate => {
                debug!("{} is up to date", reference.label());
                summary.references_up_to_date += 1;
                Ok(None)
            }
            Resolution::NoRelease => {
                warn!(
                    "Skipping {} ({}): no version tags found",
                    reference.label(),
                    location
                );
                summary.record_skip(SkipReason::NoRelease);
                Ok(None)
            }
            Resolution::UnknownCurrentVersion => {
                warn!(
                    "Skipping {} ({}): no version comment to bound the update",
                    reference.label(),
                    location
                );
                summary.record_skip(SkipReason::UnknownCurrentVersion);
                Ok(None)
            }
        }
    }
}

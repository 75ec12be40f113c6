use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Default base URL for the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// User agent sent with every API request (GitHub rejects requests without one)
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Timeout for a single API request in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of tags requested per repository
pub const TAGS_PER_PAGE: u32 = 100;

/// Upper bound for a single rate-limit wait in seconds (GitHub windows are one hour)
pub const MAX_RATE_LIMIT_WAIT_SECS: i64 = 60 * 60;

// =============================================================================
// File-related constants
// =============================================================================

/// Extensions scanned when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Suffix appended to a file name to form its backup path
pub const BACKUP_SUFFIX: &str = ".bak";

/// Directory name never descended into while scanning
pub const SKIPPED_DIR_NAME: &str = "backups";

/// What to do when the registry reports the request budget is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBehavior {
    /// Sleep until the reported reset time, then retry once
    #[default]
    Wait,
    /// Record the reference as skipped without waiting
    Skip,
}

/// Largest version jump an update may make
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MaxBump {
    /// Newest release overall
    #[default]
    Major,
    /// Newest release with the same major version
    Minor,
    /// Newest release with the same major.minor version
    Patch,
}

/// Updater configuration
///
/// Can be read from a JSON file; command-line flags are layered on top.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    /// Directory to scan
    pub path: PathBuf,
    /// GitHub token for authenticated (higher limit) requests
    pub github_token: Option<String>,
    /// Base URL of the GitHub API
    pub api_url: String,
    /// Report changes without writing files
    pub dry_run: bool,
    /// Write `<file>.bak` before modifying a file
    pub backup: bool,
    /// File extensions to scan, without the leading dot
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
    pub on_rate_limit: RateLimitBehavior,
    /// Consider pre-release tags as update candidates
    pub include_prereleases: bool,
    pub max_bump: MaxBump,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            dry_run: false,
            backup: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: false,
            on_rate_limit: RateLimitBehavior::default(),
            include_prereleases: false,
            max_bump: MaxBump::default(),
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

/// Split a comma-separated extension list, dropping blanks and leading dots
///
/// `"yml, .yaml,,"` -> `["yml", "yaml"]`
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the backup path for a file: the same name with [`BACKUP_SUFFIX`] appended
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn updater_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "dryRun": true,
            "onRateLimit": "skip"
        }))
        .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.on_rate_limit, RateLimitBehavior::Skip);
        assert_eq!(result.extensions, vec!["yml", "yaml"]);
        assert_eq!(result.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn updater_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "path": ".github/workflows",
            "githubToken": "ghp_test",
            "apiUrl": "https://github.example.com/api/v3",
            "dryRun": false,
            "backup": true,
            "extensions": ["yml"],
            "recursive": true,
            "onRateLimit": "wait",
            "includePrereleases": true,
            "maxBump": "minor"
        }))
        .unwrap();

        assert_eq!(
            result,
            UpdaterConfig {
                path: PathBuf::from(".github/workflows"),
                github_token: Some("ghp_test".to_string()),
                api_url: "https://github.example.com/api/v3".to_string(),
                dry_run: false,
                backup: true,
                extensions: vec!["yml".to_string()],
                recursive: true,
                on_rate_limit: RateLimitBehavior::Wait,
                include_prereleases: true,
                max_bump: MaxBump::Minor,
            }
        );
    }

    #[test]
    fn from_file_reads_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("updater.json");
        std::fs::write(&path, r#"{"recursive": true}"#).unwrap();

        let result = UpdaterConfig::from_file(&path).unwrap();

        assert!(result.recursive);
        assert!(!result.backup);
    }

    #[test]
    fn from_file_names_the_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.json");

        let err = UpdaterConfig::from_file(&path).unwrap_err();

        assert!(err.to_string().contains("missing.json"));
    }

    #[rstest]
    #[case("yml,yaml", vec!["yml", "yaml"])]
    #[case(" yml , .yaml ", vec!["yml", "yaml"])]
    #[case("yml,,", vec!["yml"])]
    #[case("", vec![])]
    fn parse_extensions_returns_expected(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_extensions(input), expected);
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/repo/.github/workflows/ci.yml")),
            PathBuf::from("/repo/.github/workflows/ci.yml.bak")
        );
    }
}

//! Common types for parsers

use std::ops::Range;
use std::path::PathBuf;

/// A commit-pinned action reference found in a workflow file
///
/// ```text
///       - uses: actions/checkout@8e5e7e5ab8b370d6c329ec480221332ada57f0ab # v4.1.6
///               ^^^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^   ^^^^^^
///               identifier       hash_range                                 version_range
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReference {
    /// Repository identifier in `owner/repo` form (sub-paths are not part of it)
    pub identifier: String,
    /// The pinned 40-character commit hash, as written in the file
    pub commit_hash: String,
    /// Version string from the trailing comment (e.g. "v4.1.6"), if any
    pub version: Option<String>,
    /// File the reference was read from
    pub path: PathBuf,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column of the commit hash within the line (0-indexed, bytes)
    pub column: usize,
    /// Byte range of the commit hash in the file content
    pub hash_range: Range<usize>,
    /// Byte range of the version comment token in the file content
    pub version_range: Option<Range<usize>>,
    /// Byte offset where a missing version comment gets inserted
    /// (right after the hash and any closing quote)
    pub insert_offset: usize,
}

impl ActionReference {
    /// Human-readable `owner/repo@version` label, falling back to a short hash
    pub fn label(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.identifier, version),
            None => format!("{}@{}", self.identifier, short_hash(&self.commit_hash)),
        }
    }
}

/// A reference together with the release it should be moved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUpdate {
    pub reference: ActionReference,
    /// Tag name of the new release, written verbatim into the comment
    pub new_version: String,
    /// Commit hash the new tag points at
    pub new_commit_hash: String,
}

/// First seven characters of a commit hash, git style
pub fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

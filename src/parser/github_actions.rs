//! GitHub Actions workflow file parser
//!
//! Only commit-pinned references are extracted; tag and branch refs
//! (`actions/checkout@v4`) are left alone.
//!
//! Recognised line shapes:
//! - `- uses: owner/repo@<sha>`
//! - `- uses: owner/repo@<sha> # v1.2.3`
//! - `  uses: "owner/repo/sub/path@<sha>" # v1.2.3`

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::parser::types::ActionReference;

/// Parser for GitHub Actions workflow and composite action files
pub struct GitHubActionsParser {
    /// Regex for a `uses:` line pinned to a full commit hash
    uses_re: Regex,
    /// Regex for a version token at the start of a trailing comment
    version_comment_re: Regex,
}

impl GitHubActionsParser {
    pub fn new() -> Self {
        Self {
            // Match: [- ]uses: ["]owner/repo[/path]@<40 hex>["] [trailing]
            uses_re: Regex::new(
                r#"^\s*(?:-\s+)?uses:\s*["']?(?P<owner>[A-Za-z0-9_.-]+)/(?P<repo>[A-Za-z0-9_.-]+)(?:/[^@\s"']*)?@(?P<hash>[0-9a-fA-F]{40})(?P<close>["']?)(?P<trail>(?:\s.*)?)$"#,
            )
            .expect("uses pattern is valid"),
            // Match: # v1.2.3 / #1.2 / # v2.0.0-beta.1
            version_comment_re: Regex::new(
                r"^\s+#\s*(?P<version>[vV]?\d+(?:\.\d+)*(?:[-+][0-9A-Za-z.+-]*)?)(?:\s|$)",
            )
            .expect("version comment pattern is valid"),
        }
    }

    /// Extract every commit-pinned action reference in `content`
    ///
    /// Offsets in the returned references are byte offsets into `content`.
    /// Lines that do not have the expected shape, including hashes that are
    /// not exactly 40 hex characters, are ignored.
    pub fn parse(&self, path: &Path, content: &str) -> Vec<ActionReference> {
        let mut results = Vec::new();
        let mut line_start = 0;

        for (line_num, raw_line) in content.split_inclusive('\n').enumerate() {
            let line = raw_line
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(raw_line);

            if let Some(reference) = self.parse_line(path, line, line_num, line_start) {
                debug!(
                    "Found {} at {}:{}",
                    reference.label(),
                    path.display(),
                    line_num + 1
                );
                results.push(reference);
            }

            line_start += raw_line.len();
        }

        results
    }

    fn parse_line(
        &self,
        path: &Path,
        line: &str,
        line_num: usize,
        line_start: usize,
    ) -> Option<ActionReference> {
        let caps = self.uses_re.captures(line)?;

        let owner = caps.name("owner")?.as_str();
        let repo = caps.name("repo")?.as_str();
        let hash = caps.name("hash")?;
        let close = caps.name("close")?;
        let trail = caps.name("trail")?;

        let version = self
            .version_comment_re
            .captures(trail.as_str())
            .and_then(|c| c.name("version"));

        Some(ActionReference {
            identifier: format!("{}/{}", owner, repo),
            commit_hash: hash.as_str().to_string(),
            version: version.map(|v| v.as_str().to_string()),
            path: path.to_path_buf(),
            line: line_num,
            column: hash.start(),
            hash_range: line_start + hash.start()..line_start + hash.end(),
            version_range: version
                .map(|v| line_start + trail.start() + v.start()..line_start + trail.start() + v.end()),
            insert_offset: line_start + close.end(),
        })
    }
}

impl Default for GitHubActionsParser {
    fn default() -> Self {
        Self::new()
    }
}

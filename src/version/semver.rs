//! Tag ordering for action releases
//!
//! Tags are compared as semantic versions after normalisation:
//! - a leading `v`/`V` is dropped
//! - partial versions are zero-padded (`1` -> `1.0.0`, `1.2` -> `1.2.0`)
//! - pre-releases sort below their release (`1.0.0-rc.1 < 1.0.0`)
//!
//! Tags that still do not parse are ignored. When two tags parse to the
//! same version the more specific one wins (`v1.0.0` over `v1`), then the
//! lexically greater tag, so selection is deterministic.

use semver::Version;

use crate::config::MaxBump;
use crate::version::registry::Release;

/// Strip a leading `v` or `V`
pub fn normalize_version(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
///
/// Examples:
/// - "v1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = normalize_version(version.trim());
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

fn tag_key<'a>(version: &'a Version, tag: &'a str) -> (&'a Version, usize, &'a str) {
    (version, tag.split('.').count(), tag)
}

/// Whether `candidate` is within the bump ceiling relative to `current`
fn within_bump(candidate: &Version, current: &Version, max_bump: MaxBump) -> bool {
    match max_bump {
        MaxBump::Major => true,
        MaxBump::Minor => candidate.major == current.major,
        MaxBump::Patch => candidate.major == current.major && candidate.minor == current.minor,
    }
}

/// Select the newest release
///
/// # Arguments
/// * `releases` - Releases as reported by the registry, in any order
/// * `current` - The currently pinned version, used with `max_bump` to restrict candidates
/// * `max_bump` - Largest allowed jump from `current` (ignored when `current` is None)
/// * `include_prereleases` - Whether pre-release tags are candidates
///
/// # Returns
/// The newest matching release and its parsed version, or None if no tag qualifies
pub fn find_latest<'a>(
    releases: &'a [Release],
    current: Option<&Version>,
    max_bump: MaxBump,
    include_prereleases: bool,
) -> Option<(&'a Release, Version)> {
    releases
        .iter()
        .filter_map(|r| parse_version(&r.tag).map(|v| (r, v)))
        .filter(|(_, v)| include_prereleases || v.pre.is_empty())
        .filter(|(_, v)| current.is_none_or(|cur| within_bump(v, cur, max_bump)))
        .max_by(|(ra, va), (rb, vb)| tag_key(va, &ra.tag).cmp(&tag_key(vb, &rb.tag)))
}

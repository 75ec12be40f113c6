//! Latest version resolution for pinned action references
//!
//! Given a reference, fetches the repository's releases, picks the newest
//! qualifying tag and decides whether the pin should move.
//!
//! ```text
//! ActionReference ──▶ Registry::list_releases ──▶ find_latest ──▶ Resolution
//!                       (memoised per run)
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::config::MaxBump;
use crate::parser::types::{ActionReference, ResolvedUpdate};
use crate::version::error::RegistryError;
use crate::version::registry::{Registry, Release};
use crate::version::semver::{find_latest, parse_version};

/// Outcome of resolving one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A newer release exists at a different commit
    Update(ResolvedUpdate),
    /// The pin already points at the newest qualifying release (or newer)
    UpToDate,
    /// The repository has no tag that parses as a version
    NoRelease,
    /// The bump ceiling needs the current version, but the reference has none
    UnknownCurrentVersion,
}

/// Options controlling which releases qualify
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub max_bump: MaxBump,
    pub include_prereleases: bool,
}

/// Decide whether `reference` should move, given the repository's releases
///
/// - With a parseable version comment, the newest release must be strictly
///   greater than it.
/// - Without one, the current version is treated as lowest and any release at
///   a different commit is an update.
/// - A release at the same commit never produces an update.
pub fn resolve_against(
    reference: &ActionReference,
    releases: &[Release],
    options: ResolveOptions,
) -> Resolution {
    let current = reference.version.as_deref().and_then(parse_version);

    if current.is_none() && options.max_bump != MaxBump::Major {
        return Resolution::UnknownCurrentVersion;
    }

    let Some((latest, latest_version)) = find_latest(
        releases,
        current.as_ref(),
        options.max_bump,
        options.include_prereleases,
    ) else {
        return Resolution::NoRelease;
    };

    if latest.commit_hash.eq_ignore_ascii_case(&reference.commit_hash) {
        return Resolution::UpToDate;
    }

    if current.is_some_and(|cur| latest_version <= cur) {
        return Resolution::UpToDate;
    }

    Resolution::Update(ResolvedUpdate {
        reference: reference.clone(),
        new_version: latest.tag.clone(),
        new_commit_hash: latest.commit_hash.clone(),
    })
}

/// Resolves references against a registry, fetching each repository once per run
pub struct VersionResolver<R: Registry> {
    registry: R,
    options: ResolveOptions,
    releases: HashMap<String, Vec<Release>>,
}

impl<R: Registry> VersionResolver<R> {
    pub fn new(registry: R, options: ResolveOptions) -> Self {
        Self {
            registry,
            options,
            releases: HashMap::new(),
        }
    }

    /// Resolve a single reference
    ///
    /// Registry errors are returned to the caller; nothing is memoised for a
    /// repository whose fetch failed.
    pub async fn resolve(
        &mut self,
        reference: &ActionReference,
    ) -> Result<Resolution, RegistryError> {
        if !self.releases.contains_key(&reference.identifier) {
            let releases = self.registry.list_releases(&reference.identifier).await?;
            debug!(
                "Fetched {} tags for {}",
                releases.len(),
                reference.identifier
            );
            self.releases
                .insert(reference.identifier.clone(), releases);
        }

        let releases = self
            .releases
            .get(&reference.identifier)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(resolve_against(reference, releases, self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::registry::MockRegistry;
    use rstest::rstest;
    use std::path::PathBuf;

    const OLD_HASH: &str = "1111111111111111111111111111111111111111";
    const NEW_HASH: &str = "2222222222222222222222222222222222222222";

    fn reference(identifier: &str, hash: &str, version: Option<&str>) -> ActionReference {
        ActionReference {
            identifier: identifier.to_string(),
            commit_hash: hash.to_string(),
            version: version.map(str::to_string),
            path: PathBuf::from("ci.yml"),
            line: 0,
            column: 0,
            hash_range: 0..40,
            version_range: None,
            insert_offset: 40,
        }
    }

    fn checkout_releases() -> Vec<Release> {
        vec![
            Release::new("v4.1.0", NEW_HASH),
            Release::new("v4.0.0", "3333333333333333333333333333333333333333"),
            Release::new("v3.0.0", OLD_HASH),
        ]
    }

    #[test]
    fn resolve_against_updates_outdated_pin() {
        let reference = reference("actions/checkout", OLD_HASH, Some("v3.0.0"));

        let result = resolve_against(&reference, &checkout_releases(), ResolveOptions::default());

        assert_eq!(
            result,
            Resolution::Update(ResolvedUpdate {
                reference,
                new_version: "v4.1.0".to_string(),
                new_commit_hash: NEW_HASH.to_string(),
            })
        );
    }

    #[rstest]
    #[case::same_hash(NEW_HASH, Some("v4.1.0"))]
    #[case::same_hash_without_comment(NEW_HASH, None)]
    #[case::same_version_other_hash(OLD_HASH, Some("v4.1.0"))]
    #[case::newer_than_latest(OLD_HASH, Some("v5.0.0"))]
    fn resolve_against_returns_up_to_date(#[case] hash: &str, #[case] version: Option<&str>) {
        let reference = reference("actions/checkout", hash, version);

        let result = resolve_against(&reference, &checkout_releases(), ResolveOptions::default());

        assert_eq!(result, Resolution::UpToDate);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::not_a_version(Some("main"))]
    fn resolve_against_treats_unknown_current_version_as_lowest(#[case] version: Option<&str>) {
        let reference = reference("actions/checkout", OLD_HASH, version);

        let result = resolve_against(&reference, &checkout_releases(), ResolveOptions::default());

        assert!(matches!(
            result,
            Resolution::Update(ResolvedUpdate { ref new_version, .. }) if new_version == "v4.1.0"
        ));
    }

    #[test]
    fn resolve_against_never_selects_a_lower_version() {
        let releases = vec![
            Release::new("v1.0.0", NEW_HASH),
            Release::new("v2.0.0-rc.1", "4444444444444444444444444444444444444444"),
        ];
        let reference = reference("actions/checkout", OLD_HASH, Some("v1.5.0"));

        let result = resolve_against(&reference, &releases, ResolveOptions::default());

        assert_eq!(result, Resolution::UpToDate);
    }

    #[test]
    fn resolve_against_respects_bump_ceiling() {
        let reference = reference("actions/checkout", OLD_HASH, Some("v3.0.0"));
        let options = ResolveOptions {
            max_bump: MaxBump::Minor,
            include_prereleases: false,
        };

        let result = resolve_against(&reference, &checkout_releases(), options);

        assert_eq!(result, Resolution::UpToDate);
    }

    #[test]
    fn resolve_against_requires_current_version_for_bump_ceiling() {
        let reference = reference("actions/checkout", OLD_HASH, None);
        let options = ResolveOptions {
            max_bump: MaxBump::Patch,
            include_prereleases: false,
        };

        let result = resolve_against(&reference, &checkout_releases(), options);

        assert_eq!(result, Resolution::UnknownCurrentVersion);
    }

    #[test]
    fn resolve_against_reports_no_release_without_version_tags() {
        let releases = vec![Release::new("nightly", NEW_HASH)];
        let reference = reference("actions/checkout", OLD_HASH, Some("v1.0.0"));

        let result = resolve_against(&reference, &releases, ResolveOptions::default());

        assert_eq!(result, Resolution::NoRelease);
    }

    #[tokio::test]
    async fn resolve_fetches_each_repository_once() {
        let mut registry = MockRegistry::new();
        registry
            .expect_list_releases()
            .times(1)
            .returning(|_| Ok(checkout_releases()));

        let mut resolver = VersionResolver::new(registry, ResolveOptions::default());
        let first = reference("actions/checkout", OLD_HASH, Some("v3.0.0"));
        let second = reference("actions/checkout", NEW_HASH, Some("v4.1.0"));

        assert!(matches!(
            resolver.resolve(&first).await.unwrap(),
            Resolution::Update(_)
        ));
        assert_eq!(resolver.resolve(&second).await.unwrap(), Resolution::UpToDate);
    }

    #[tokio::test]
    async fn resolve_propagates_registry_errors_without_memoising() {
        let mut registry = MockRegistry::new();
        registry
            .expect_list_releases()
            .times(2)
            .returning(|identifier| Err(RegistryError::NotFound(identifier.to_string())));

        let mut resolver = VersionResolver::new(registry, ResolveOptions::default());
        let missing = reference("nonexistent/repo", OLD_HASH, Some("v1.0.0"));

        for _ in 0..2 {
            let result = resolver.resolve(&missing).await;
            assert!(matches!(result, Err(RegistryError::NotFound(ref name)) if name == "nonexistent/repo"));
        }
    }
}

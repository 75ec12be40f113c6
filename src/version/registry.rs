//! Registry trait for listing the releases of an action repository

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// A tag published by an action repository and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag name as published (e.g., "v4.1.0")
    pub tag: String,
    /// Commit hash the tag resolves to
    pub commit_hash: String,
}

impl Release {
    pub fn new(tag: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            commit_hash: commit_hash.into(),
        }
    }
}

/// Trait for fetching releases from a registry
///
/// Takes `&mut self` because implementations carry the rate-limit state
/// reported by the previous response.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send {
    /// Fetches the releases of a repository
    ///
    /// # Arguments
    /// * `identifier` - The repository in `owner/repo` form (e.g., "actions/checkout")
    ///
    /// # Returns
    /// * `Ok(Vec<Release>)` - Releases in the order the registry reports them
    /// * `Err(RegistryError)` - If the fetch fails or the rate limit is exhausted
    async fn list_releases(&mut self, identifier: &str) -> Result<Vec<Release>, RegistryError>;
}

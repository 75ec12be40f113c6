//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use gha_pin_updater::version::error::RegistryError;
use gha_pin_updater::version::registry::{Registry, Release};

/// Canned failure returned for a repository
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    RateLimited,
    Unauthorized,
    InvalidResponse,
}

/// Mock registry for testing
///
/// Repositories without releases or a failure are reported as not found.
#[derive(Default)]
pub struct MockRegistry {
    releases: HashMap<String, Vec<Release>>,
    failures: HashMap<String, Failure>,
    calls: Arc<AtomicUsize>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_releases(mut self, identifier: &str, releases: &[(&str, &str)]) -> Self {
        self.releases.insert(
            identifier.to_string(),
            releases
                .iter()
                .map(|(tag, hash)| Release::new(*tag, *hash))
                .collect(),
        );
        self
    }

    pub fn with_failure(mut self, identifier: &str, failure: Failure) -> Self {
        self.failures.insert(identifier.to_string(), failure);
        self
    }

    /// Handle on the number of `list_releases` calls, readable after the
    /// registry has been moved into a runner
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn list_releases(&mut self, identifier: &str) -> Result<Vec<Release>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.get(identifier) {
            return Err(match failure {
                Failure::RateLimited => RegistryError::RateLimited { reset_at: None },
                Failure::Unauthorized => RegistryError::Unauthorized,
                Failure::InvalidResponse => {
                    RegistryError::InvalidResponse("unexpected body".to_string())
                }
            });
        }

        match self.releases.get(identifier) {
            Some(releases) => Ok(releases.clone()),
            None => Err(RegistryError::NotFound(identifier.to_string())),
        }
    }
}

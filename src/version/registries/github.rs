//! GitHub Tags API registry implementation

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{RateLimitBehavior, REQUEST_TIMEOUT_SECS, TAGS_PER_PAGE, USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::rate_limit::RateLimitState;
use crate::version::registry::{Registry, Release};

/// Response item from GitHub Tags API
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
    commit: TagCommit,
}

#[derive(Debug, Deserialize)]
struct TagCommit {
    sha: String,
}

/// Registry implementation for the GitHub Tags API
///
/// Every response refreshes the stored [`RateLimitState`]. When the budget
/// is exhausted the client either sleeps until the reported reset and
/// retries once ([`RateLimitBehavior::Wait`]) or fails fast with
/// [`RegistryError::RateLimited`] ([`RateLimitBehavior::Skip`]).
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    on_rate_limit: RateLimitBehavior,
    rate_limit: RateLimitState,
    clock: fn() -> i64,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry against `base_url`
    ///
    /// Requests are authenticated with `token` when one is given.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        on_rate_limit: RateLimitBehavior,
    ) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            on_rate_limit,
            rate_limit: RateLimitState::default(),
            clock: now_epoch_secs,
        })
    }

    /// Replace the source of "now" (epoch seconds) used for reset math
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    async fn wait_for_reset(&self) {
        let wait = self.rate_limit.wait_duration((self.clock)());
        info!(
            "GitHub API rate limit exhausted, waiting {}s until reset",
            wait.as_secs()
        );
        tokio::time::sleep(wait).await;
    }

    async fn fetch_tags(&mut self, identifier: &str) -> Result<Vec<Release>, RegistryError> {
        let url = format!(
            "{}/repos/{}/tags?per_page={}",
            self.base_url, identifier, TAGS_PER_PAGE
        );
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        self.rate_limit = RateLimitState::from_headers(response.headers(), (self.clock)());

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(identifier.to_string()));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RegistryError::Unauthorized);
        }

        let budget_spent = self.rate_limit.remaining == Some(0);
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && budget_spent)
        {
            return Err(RegistryError::RateLimited {
                reset_at: self.rate_limit.reset_at,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let tags: Vec<Tag> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub tags response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(tags
            .into_iter()
            .map(|t| Release::new(t.name, t.commit.sha))
            .collect())
    }
}

#[async_trait::async_trait]
impl Registry for GitHubRegistry {
    async fn list_releases(&mut self, identifier: &str) -> Result<Vec<Release>, RegistryError> {
        if self.rate_limit.is_exhausted((self.clock)()) {
            match self.on_rate_limit {
                RateLimitBehavior::Skip => {
                    debug!("Skipping {}: rate limit exhausted", identifier);
                    return Err(RegistryError::RateLimited {
                        reset_at: self.rate_limit.reset_at,
                    });
                }
                RateLimitBehavior::Wait => self.wait_for_reset().await,
            }
        }

        match self.fetch_tags(identifier).await {
            Err(RegistryError::RateLimited { .. })
                if self.on_rate_limit == RateLimitBehavior::Wait =>
            {
                self.wait_for_reset().await;
                self.fetch_tags(identifier).await
            }
            result => result,
        }
    }
}

fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

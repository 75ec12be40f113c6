use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: resets at {reset_at:?}")]
    RateLimited { reset_at: Option<i64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: the GitHub token was rejected")]
    Unauthorized,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

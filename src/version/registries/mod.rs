//! Registry implementations for fetching action releases

pub mod github;

pub use github::GitHubRegistry;

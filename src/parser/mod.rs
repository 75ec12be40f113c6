//! Parser layer
//! - types.rs: Common types (ActionReference, ResolvedUpdate)
//! - github_actions.rs: GitHub Actions workflow parser

pub mod github_actions;
pub mod types;

pub use github_actions::GitHubActionsParser;
pub use types::{ActionReference, ResolvedUpdate};

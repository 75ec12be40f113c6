//! Version layer for action references
//!
//! Fetches the tags of an action repository, orders them as semantic
//! versions and decides whether a pin should move.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Resolver   │────▶│ Resolution  │
//! │  (fetch)    │     │ (memo, cmp) │     │ (update?)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Rate limit  │     │   Semver    │
//! │ (wait/skip) │     │ (tag order) │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait and the `Release` type
//! - [`registries`]: GitHub Tags API implementation
//! - [`rate_limit`]: Rate-limit metadata carried between requests
//! - [`resolver`]: Latest-release selection and update decision
//! - [`semver`]: Tag normalisation and ordering
//! - [`error`]: Error types for registry operations

pub mod error;
pub mod rate_limit;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod semver;

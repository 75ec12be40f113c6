//! File rewrite layer
//! - edit.rs: Byte-range text edits and line diffs
//! - file.rs: Applies resolved updates to a file (dry-run, backup, atomic write)
//! - error.rs: Error types for reading and writing workflow files

pub mod edit;
pub mod error;
pub mod file;

pub use edit::{LineChange, TextEdit};
pub use error::UpdateError;
pub use file::{FileOutcome, FileUpdater};

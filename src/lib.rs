pub mod config;
pub mod parser;
pub mod runner;
pub mod summary;
pub mod update;
pub mod version;
pub mod walker;

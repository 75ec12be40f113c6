pub mod registry;
pub mod workspace;

pub use registry::*;
pub use workspace::*;

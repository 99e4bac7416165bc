// Public modules
pub mod blender;
pub mod defaults;
pub mod error;
pub mod gist;
pub mod invocation;
pub mod scratch;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};

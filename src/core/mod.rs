// Public modules
pub mod build;
pub mod config;
pub mod error;
pub mod generator;
pub mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};

//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Script execution with captured output
//! - `io` - File I/O with consistent error handling
//! - `template` - String template rendering
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod template;
pub mod validation;

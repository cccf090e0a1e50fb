//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod build;

// Re-export main command functions
pub use build::{execute_build, validate_args, BuildArgs};

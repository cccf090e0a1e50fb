//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while constructing a frame policy or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unrecognized categorization mode: {0} (expected line, method, class or package)")]
    UnknownMode(String),

    #[error("Unrecognized frame order: {0} (expected root-first or leaf-first)")]
    UnknownFrameOrder(String),
}

/// Errors that can occur while reading sample input
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read sample file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid sample format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty tree: no stacks to render")]
    EmptyTree,

    #[error("Flamegraph rendering failed: {0}")]
    RenderFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

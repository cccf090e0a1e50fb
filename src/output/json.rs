//! JSON tree document output writer.
//!
//! Writes built trees to JSON files wrapped in a versioned document with
//! build statistics and a generation timestamp.

use crate::tree::TreeView;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level document written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// Categorization mode the tree was built with
    pub mode: String,

    /// Samples that contributed a path
    pub sample_count: u64,

    /// Samples skipped for missing or empty stacks
    pub skipped_samples: u64,

    /// Timestamp when the document was generated
    pub generated_at: String,

    /// The serialized tree, rooted at "root"
    pub tree: TreeView,
}

impl TreeDocument {
    /// Wrap a serialized tree in a fresh document
    pub fn new(mode: String, sample_count: u64, skipped_samples: u64, tree: TreeView) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            mode,
            sample_count,
            skipped_samples,
            generated_at: Utc::now().to_rfc3339(),
            tree,
        }
    }
}

/// Write a tree document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_document(document: &TreeDocument, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing tree document to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    info!("Tree document written successfully");
    Ok(())
}

/// Read a tree document from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_document(input_path: impl AsRef<Path>) -> Result<TreeDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading tree document from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: TreeDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Document loaded: version {}, {} samples",
        document.version, document.sample_count
    );

    Ok(document)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

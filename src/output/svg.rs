//! SVG flamegraph output writer.
//!
//! Writes SVG content to files with proper encoding.

use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// # Arguments
/// * `svg_content` - SVG string from flamegraph generation
/// * `output_path` - Path to output SVG file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SVG to: {}", output_path.display());

    validate_svg_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::InvalidPath(format!("Cannot create directory: {}", e)))?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(svg_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "SVG written successfully ({} bytes, {:.2} KB)",
        svg_content.len(),
        svg_content.len() as f64 / 1024.0
    );

    Ok(())
}

/// Validate output path for SVG
///
/// **Private** - internal validation
fn validate_svg_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(ext) = path.extension() {
        if ext != "svg" {
            debug!("File does not have .svg extension: {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const VALID_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <rect x="0" y="0" width="100" height="100" fill="red"/>
</svg>"#;

    #[test]
    fn test_write_svg() {
        let temp_file = NamedTempFile::new().unwrap();
        write_svg(VALID_SVG, temp_file.path()).unwrap();
        assert!(std::fs::read_to_string(temp_file.path())
            .unwrap()
            .contains("<svg"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/flamegraph.svg");

        write_svg(VALID_SVG, &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_validate_svg_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_svg_path(temp_dir.path());
        assert!(result.is_err());
    }
}

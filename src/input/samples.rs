//! Sample file schema, validation, and normalization.
//!
//! Recorders disagree on frame delivery order: some write stacks
//! outermost-first ("root-first"), others innermost-first ("leaf-first").
//! The tree builder only ever walks root-first, so the loader normalizes
//! at the boundary; a silently inverted order would produce a leaf-rooted
//! tree, which is why the order is explicit in the file.

use crate::frame::StackFrame;
use crate::utils::error::{ConfigError, InputError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Frame delivery order declared by a sample file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameOrder {
    /// Outermost frame first (the builder's native order)
    #[default]
    RootFirst,
    /// Innermost frame first; reversed during loading
    LeafFirst,
}

impl FromStr for FrameOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "root-first" => Ok(Self::RootFirst),
            "leaf-first" => Ok(Self::LeafFirst),
            other => Err(ConfigError::UnknownFrameOrder(other.to_string())),
        }
    }
}

/// One recorded stack trace plus optional weight
///
/// **Public** - the unit of input to the tree builder
///
/// `frames` is `None` when the recorder captured no stack attribute at all,
/// as opposed to an empty stack; both are skippable data defects, not
/// errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackSample {
    /// Ordered frames, outermost-first once normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<StackFrame>>,

    /// Explicit metric value; absent means a weight of 1
    #[serde(
        default,
        alias = "value",
        alias = "duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
}

/// Top-level sample file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleFile {
    /// Schema version, for future evolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Frame delivery order of every sample in the file
    #[serde(default)]
    pub frame_order: FrameOrder,

    /// The recorded samples
    pub samples: Vec<StackSample>,
}

/// Read a sample file, validate it, and normalize frame order
///
/// **Public** - main entry point for sample input
///
/// # Arguments
/// * `path` - Path to a JSON sample file
/// * `order_override` - Forced frame order, overriding the file's declaration
///
/// # Errors
/// * `InputError::ReadFailed` - I/O error opening the file
/// * `InputError::JsonError` - malformed JSON
/// * `InputError::InvalidFormat` - structurally valid JSON with bad values
pub fn read_samples(
    path: impl AsRef<Path>,
    order_override: Option<FrameOrder>,
) -> Result<Vec<StackSample>, InputError> {
    let path = path.as_ref();
    debug!("Reading samples from: {}", path.display());

    let file = File::open(path)?;
    let mut sample_file: SampleFile = serde_json::from_reader(BufReader::new(file))?;

    validate_sample_format(&sample_file)?;

    if let Some(order) = order_override {
        sample_file.frame_order = order;
    }
    let samples = normalize_samples(sample_file);

    info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Validate sample values beyond what deserialization checks
///
/// **Public** - also used by the validate command
pub fn validate_sample_format(file: &SampleFile) -> Result<(), InputError> {
    for (i, sample) in file.samples.iter().enumerate() {
        if let Some(weight) = sample.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(InputError::InvalidFormat(format!(
                    "Sample {} has non-finite or negative weight: {}",
                    i, weight
                )));
            }
        }
    }
    Ok(())
}

/// Reverse leaf-first stacks so the builder always walks root-first
fn normalize_samples(file: SampleFile) -> Vec<StackSample> {
    let mut samples = file.samples;
    if file.frame_order == FrameOrder::LeafFirst {
        debug!("Normalizing {} leaf-first samples to root-first", samples.len());
        for sample in &mut samples {
            if let Some(frames) = &mut sample.frames {
                frames.reverse();
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_root_first_samples() {
        let file = write_file(
            r#"{
                "samples": [
                    {"frames": [{"type_name": "Main", "method": "main"},
                                {"type_name": "Main", "method": "work"}],
                     "weight": 2.0},
                    {"weight": 1.0}
                ]
            }"#,
        );
        let samples = read_samples(file.path(), None).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].frames.as_ref().unwrap()[0].method, "main");
        assert!(samples[1].frames.is_none());
    }

    #[test]
    fn test_leaf_first_is_reversed() {
        let file = write_file(
            r#"{
                "frame_order": "leaf-first",
                "samples": [
                    {"frames": [{"type_name": "Main", "method": "leaf"},
                                {"type_name": "Main", "method": "main"}]}
                ]
            }"#,
        );
        let samples = read_samples(file.path(), None).unwrap();
        let frames = samples[0].frames.as_ref().unwrap();
        assert_eq!(frames[0].method, "main");
        assert_eq!(frames[1].method, "leaf");
    }

    #[test]
    fn test_order_override_wins() {
        let file = write_file(
            r#"{"samples": [{"frames": [{"type_name": "T", "method": "leaf"},
                                        {"type_name": "T", "method": "main"}]}]}"#,
        );
        let samples = read_samples(file.path(), Some(FrameOrder::LeafFirst)).unwrap();
        assert_eq!(samples[0].frames.as_ref().unwrap()[0].method, "main");
    }

    #[test]
    fn test_weight_alias() {
        let file = write_file(r#"{"samples": [{"value": 3.5}]}"#);
        let samples = read_samples(file.path(), None).unwrap();
        assert_eq!(samples[0].weight, Some(3.5));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let file = write_file(r#"{"samples": [{"weight": -1.0}]}"#);
        let err = read_samples(file.path(), None).unwrap_err();
        assert!(matches!(err, InputError::InvalidFormat(_)));
    }

    #[test]
    fn test_frame_order_parse() {
        assert_eq!("leaf-first".parse::<FrameOrder>().unwrap(), FrameOrder::LeafFirst);
        assert!("inside-out".parse::<FrameOrder>().is_err());
    }
}

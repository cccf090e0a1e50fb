//! Sample input: file schema, validation, and frame-order normalization.
//!
//! This module is the boundary between recorders and the tree builder:
//! samples arrive as JSON, get validated, and leave in the builder's
//! root-first frame order.

pub mod samples;

// Re-export main types
pub use samples::{read_samples, validate_sample_format, FrameOrder, SampleFile, StackSample};

//! Flamegraph generation using the inferno library.
//!
//! This module folds built trees into collapsed stack format and renders
//! interactive SVG flamegraphs from them.

pub mod collapse;

// Re-export main types
pub use collapse::{collapse_tree, generate_flamegraph, CollapsedStack, FlamegraphConfig};

//! Output writers for tree documents and flamegraphs.
//!
//! This module handles writing data to disk:
//! - JSON tree documents (versioned, with build statistics)
//! - SVG flamegraphs

pub mod json;
pub mod svg;

// Re-export main functions
pub use json::{read_document, write_document, TreeDocument};
pub use svg::write_svg;

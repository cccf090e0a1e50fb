//! Aggregation of stack samples into a weighted, deduplicated call tree.
//!
//! This module transforms collections of recorded stack samples into:
//! - A merged call tree keyed by root-to-node path identity
//! - A nested name/value/children view for flame-graph renderers

pub mod builder;
pub mod model;
pub mod view;

// Re-export main types and functions
pub use builder::{build_tree, build_tree_cancellable};
pub use model::{Node, NodeId, StackTree};
pub use view::{to_view, TreeView};

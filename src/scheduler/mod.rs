//! Debounced single-flight scheduling for tree builds.
//!
//! This module keeps the (potentially expensive) tree build responsive
//! under bursty input:
//! - Bursts of submissions coalesce inside a debounce window
//! - At most one build runs at a time, on a dedicated worker thread
//! - Superseded builds are cancelled and their results discarded

pub mod debounce;
pub mod handle;

// Re-export main types
pub use debounce::TreeScheduler;
pub use handle::{BuildHandle, BuildOutcome};

//! Flametree
//!
//! Aggregates recorded stack samples into weighted, deduplicated call
//! trees for flame-graph rendering, with a debounced single-flight
//! scheduler that keeps recomputation responsive under bursty input.
//!
//! This crate provides the core implementation for the `flametree`
//! CLI tool and a library API for UI-adjacent callers:
//!
//! ```
//! use flametree::frame::{FramePolicy, StackFrame};
//! use flametree::input::StackSample;
//! use flametree::tree::{build_tree, to_view};
//!
//! let samples = vec![StackSample {
//!     frames: Some(vec![
//!         StackFrame::new("app.Main", "main"),
//!         StackFrame::new("app.Main", "work"),
//!     ]),
//!     weight: None,
//! }];
//! let policy = FramePolicy::new("method", false).unwrap();
//! let tree = build_tree(&samples, &policy);
//! let view = to_view(&tree);
//! assert_eq!(view.name, "root");
//! ```
//!
//! Bursty callers submit through [`scheduler::TreeScheduler`] instead of
//! calling [`tree::build_tree`] directly.

pub mod commands;
pub mod flamegraph;
pub mod frame;
pub mod input;
pub mod output;
pub mod scheduler;
pub mod tree;
pub mod utils;

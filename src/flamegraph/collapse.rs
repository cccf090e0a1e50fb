//! Fold a built tree into collapsed stack format and render it.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "main;execute;parse 12"
//! This means: main called execute which called parse, where 12 units of
//! weight terminated.

use crate::tree::{NodeId, StackTree};
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::{debug, info};

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generation and text summaries
#[derive(Debug, Clone)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight terminating at this stack
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as one line of collapsed format
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Fold a tree into collapsed stacks
///
/// **Public** - entry point for flamegraph and summary output
///
/// Emits one entry per node where samples terminated (own weight > 0),
/// sorted by weight descending. Fractional weights are rounded to the
/// nearest integer, since the collapsed format carries integer counts.
pub fn collapse_tree(tree: &StackTree) -> Vec<CollapsedStack> {
    let mut stacks = Vec::new();
    let mut path: Vec<String> = Vec::new();
    for child in tree.children_of(NodeId::ROOT) {
        collect(tree, child, &mut path, &mut stacks);
    }
    stacks.sort_by(|a, b| b.weight.cmp(&a.weight));

    debug!("Folded tree into {} collapsed stacks", stacks.len());
    stacks
}

fn collect(tree: &StackTree, id: NodeId, path: &mut Vec<String>, out: &mut Vec<CollapsedStack>) {
    let Some(node) = tree.node(id) else { return };
    path.push(node.frame.label().to_string());

    if node.own_count > 0 {
        let weight = node.own_weight.round() as u64;
        if weight > 0 {
            out.push(CollapsedStack::new(path.join(";"), weight));
        }
    }
    for child in tree.children_of(id) {
        collect(tree, child, path, out);
    }

    path.pop();
}

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub count_name: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Stack Sample Profile".to_string(),
            count_name: "samples".to_string(),
            width: 1200,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_count_name(mut self, count_name: impl Into<String>) -> Self {
        self.count_name = count_name.into();
        self
    }
}

/// Generate an SVG flamegraph from collapsed stacks via inferno
///
/// **Public** - main entry point for SVG generation
///
/// # Errors
/// * `FlamegraphError::EmptyTree` - no stacks to render
/// * `FlamegraphError::RenderFailed` - inferno rejected the input
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyTree);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph from {} stacks", stacks.len());

    let mut options = Options::default();
    options.title = config.title.clone();
    options.count_name = config.count_name.clone();
    options.image_width = Some(config.width);

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();
    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    let svg = String::from_utf8(svg)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    info!("Flamegraph generated successfully ({} bytes)", svg.len());
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FramePolicy, StackFrame};
    use crate::input::StackSample;
    use crate::tree::build_tree;

    fn sample(names: &[&str], weight: Option<f64>) -> StackSample {
        StackSample {
            frames: Some(names.iter().map(|n| StackFrame::new("T", *n)).collect()),
            weight,
        }
    }

    #[test]
    fn test_collapse_emits_terminating_paths_only() {
        let samples = vec![
            sample(&["main", "foo", "bar"], None),
            sample(&["main", "foo", "bar"], None),
            sample(&["main", "foo"], None),
        ];
        let tree = build_tree(&samples, &FramePolicy::new("method", false).unwrap());
        let stacks = collapse_tree(&tree);

        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].stack, "T.main;T.foo;T.bar");
        assert_eq!(stacks[0].weight, 2);
        assert_eq!(stacks[1].stack, "T.main;T.foo");
        assert_eq!(stacks[1].weight, 1);
    }

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main;execute;parse".to_string(), 1000);
        assert_eq!(stack.to_line(), "main;execute;parse 1000");
    }

    #[test]
    fn test_generate_flamegraph_empty_is_error() {
        assert!(matches!(
            generate_flamegraph(&[], None),
            Err(FlamegraphError::EmptyTree)
        ));
    }

    #[test]
    fn test_generate_flamegraph_produces_svg() {
        let stacks = vec![
            CollapsedStack::new("main;foo".to_string(), 3),
            CollapsedStack::new("main;bar".to_string(), 1),
        ];
        let svg = generate_flamegraph(&stacks, Some(&FlamegraphConfig::new().with_title("t"))).unwrap();
        assert!(svg.contains("<svg"));
    }
}

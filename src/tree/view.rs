//! Nested name/value/children view of a built tree.
//!
//! This is the wire shape flame-graph renderers consume. `children` is
//! present iff a node has at least one child; leaves omit the field
//! entirely rather than carrying an empty array, which consumers rely on.

use crate::tree::model::{NodeId, StackTree};
use serde::{Deserialize, Serialize};

/// One serialized tree vertex
///
/// **Public** - the output wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeView {
    /// Human-readable frame label ("root" for the synthetic root)
    pub name: String,

    /// Own sample count of the node (0 for the root)
    pub value: u64,

    /// Child views, omitted entirely for leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeView>>,
}

/// Serialize a tree into its nested view, rooted at the sentinel
///
/// **Public** - pure; serializing the same tree twice yields identical
/// views (children are emitted in ascending node-id order).
pub fn to_view(tree: &StackTree) -> TreeView {
    TreeView {
        name: "root".to_string(),
        value: 0,
        children: children_of(tree, NodeId::ROOT),
    }
}

fn children_of(tree: &StackTree, id: NodeId) -> Option<Vec<TreeView>> {
    let views: Vec<TreeView> = tree
        .children_of(id)
        .filter_map(|child_id| tree.node(child_id))
        .map(|node| TreeView {
            name: node.frame.label().to_string(),
            value: node.own_count,
            children: children_of(tree, node.id),
        })
        .collect();
    if views.is_empty() {
        None
    } else {
        Some(views)
    }
}

//! Tree data model: node ids, nodes, and the tree container.
//!
//! A node id is derived from the node's frame identity and its parent's id,
//! so two identity-equal root-to-node paths resolve to the same id and merge
//! by construction, with no tree diffing.

use crate::frame::FrameIdentity;
use std::collections::{BTreeSet, HashMap};

/// Identifier of one distinct root-to-node call path
///
/// A 64-bit FNV-1a combine of the parent id and the frame identity hash.
/// Collisions between structurally different paths are possible but
/// vanishingly unlikely at 64 bits; the scheme trades collision-freedom for
/// constant-time merging. Id 0 is reserved for the synthetic root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Sentinel id of the synthetic root (never materialized as a Node)
    pub const ROOT: NodeId = NodeId(0);

    /// Combine a parent path id with a frame identity into a child id
    pub fn combine(parent: NodeId, identity: &FrameIdentity) -> NodeId {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for b in parent
            .0
            .to_le_bytes()
            .iter()
            .chain(identity.hash64().to_le_bytes().iter())
        {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        if hash == 0 {
            // 0 is the root sentinel; remap the (absurdly unlikely) collision
            hash = 0x9e37_79b9_7f4a_7c15;
        }
        NodeId(hash)
    }

    /// Raw id value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// True for the synthetic root sentinel
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

/// Aggregated tree vertex for one distinct call path
#[derive(Debug, Clone)]
pub struct Node {
    /// Path identity of this node
    pub id: NodeId,

    /// Canonical frame this node aggregates
    pub frame: FrameIdentity,

    /// Weight of samples terminating exactly here
    pub own_weight: f64,

    /// Count of samples terminating exactly here
    pub own_count: u64,

    /// Weight of all samples passing through here
    pub cumulative_weight: f64,

    /// Count of all samples passing through here
    pub cumulative_count: u64,
}

impl Node {
    pub(crate) fn new(id: NodeId, frame: FrameIdentity) -> Self {
        Self {
            id,
            frame,
            own_weight: 0.0,
            own_count: 0,
            cumulative_weight: 0.0,
            cumulative_count: 0,
        }
    }
}

/// Weighted, deduplicated call tree built from a set of stack samples
///
/// **Public** - output of the tree builder, input to serialization
///
/// Invariants: `children` partitions all non-root ids disjointly by parent;
/// `parent` and `children` are mutual inverses; the root exists only as the
/// sentinel key in `children`.
#[derive(Debug, Clone)]
pub struct StackTree {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) parent: HashMap<NodeId, NodeId>,
    pub(crate) children: HashMap<NodeId, BTreeSet<NodeId>>,

    /// Samples that contributed a path
    pub(crate) aggregated_samples: u64,

    /// Samples skipped for missing or empty stacks
    pub(crate) skipped_samples: u64,
}

impl StackTree {
    pub(crate) fn new() -> Self {
        let mut children = HashMap::new();
        children.insert(NodeId::ROOT, BTreeSet::new());
        Self {
            nodes: HashMap::new(),
            parent: HashMap::new(),
            children,
            aggregated_samples: 0,
            skipped_samples: 0,
        }
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Parent id of a node (None for children of the root)
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(&id).filter(|p| !p.is_root()).copied()
    }

    /// Children of a node, in ascending id order
    ///
    /// The root sentinel always has an entry, possibly empty.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children.get(&id).into_iter().flatten().copied()
    }

    /// Number of distinct call paths (nodes) in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when no sample contributed a path
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Samples that contributed a path
    pub fn aggregated_samples(&self) -> u64 {
        self.aggregated_samples
    }

    /// Samples skipped for missing or empty stacks
    pub fn skipped_samples(&self) -> u64 {
        self.skipped_samples
    }

    /// Fetch-or-create the node for `id`, wiring parent/children links
    pub(crate) fn get_or_create(&mut self, id: NodeId, parent: NodeId, frame: &FrameIdentity) -> &mut Node {
        self.parent.entry(id).or_insert(parent);
        self.children.entry(id).or_default();
        // children is a set, so re-registration is idempotent
        self.children.entry(parent).or_default().insert(id);
        self.nodes
            .entry(id)
            .or_insert_with(|| Node::new(id, frame.clone()))
    }
}

//! Build the aggregated call tree from stack samples.
//!
//! Each sample's frames are walked outermost to innermost; every distinct
//! root-to-frame path maps to one node id, so samples sharing a prefix merge
//! into the same nodes as they are inserted.

use crate::frame::FramePolicy;
use crate::input::StackSample;
use crate::tree::model::{NodeId, StackTree};
use crate::utils::config::CANCEL_CHECK_INTERVAL;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// Build a tree from a collection of samples
///
/// **Public** - main entry point for direct (unscheduled) builds
///
/// # Arguments
/// * `samples` - Recorded samples, frames ordered outermost-first
/// * `policy` - Frame identity policy governing aggregation
///
/// Samples with a missing or empty stack trace are skipped with a diagnostic
/// and counted in the tree's skip statistics; they never abort the build.
pub fn build_tree(samples: &[StackSample], policy: &FramePolicy) -> StackTree {
    let mut tree = StackTree::new();
    for sample in samples {
        add_sample(&mut tree, sample, policy);
    }
    debug!(
        "Built tree: {} nodes from {} samples ({} skipped)",
        tree.node_count(),
        tree.aggregated_samples(),
        tree.skipped_samples()
    );
    tree
}

/// Build a tree, checking a cancellation flag at a bounded sample granularity
///
/// **Public** - used by the scheduler for cooperative cancellation
///
/// Returns `None` if the flag was observed set; a cancelled build never
/// yields a partial tree.
pub fn build_tree_cancellable(
    samples: &[StackSample],
    policy: &FramePolicy,
    cancelled: &AtomicBool,
) -> Option<StackTree> {
    let mut tree = StackTree::new();
    for (i, sample) in samples.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancelled.load(Ordering::Relaxed) {
            debug!("Build cancelled after {} of {} samples", i, samples.len());
            return None;
        }
        add_sample(&mut tree, sample, policy);
    }
    if cancelled.load(Ordering::Relaxed) {
        debug!("Build cancelled at completion; discarding tree");
        return None;
    }
    debug!(
        "Built tree: {} nodes from {} samples ({} skipped)",
        tree.node_count(),
        tree.aggregated_samples(),
        tree.skipped_samples()
    );
    Some(tree)
}

/// Walk one sample's frames into the tree
fn add_sample(tree: &mut StackTree, sample: &StackSample, policy: &FramePolicy) {
    let frames = match &sample.frames {
        None => {
            debug!("Skipping sample with no captured stack trace");
            tree.skipped_samples += 1;
            return;
        }
        Some(frames) if frames.is_empty() => {
            debug!("Skipping sample with empty stack trace");
            tree.skipped_samples += 1;
            return;
        }
        Some(frames) => frames,
    };

    let weight = sample.weight.unwrap_or(1.0);
    let last = frames.len() - 1;
    let mut parent_id = NodeId::ROOT;

    for (i, frame) in frames.iter().enumerate() {
        let identity = policy.identity_of(frame);

        // Direct recursive self-calls fold into the current parent node when
        // the policy asks for it. The sample already passed through that
        // node, so cumulative fields must not accumulate twice.
        let collapsed = policy.collapse_recursion()
            && !parent_id.is_root()
            && matches!(tree.node(parent_id), Some(n) if n.frame == identity);

        let node_id = if collapsed {
            parent_id
        } else {
            NodeId::combine(parent_id, &identity)
        };

        if !collapsed {
            let node = tree.get_or_create(node_id, parent_id, &identity);
            node.cumulative_weight += weight;
            node.cumulative_count += 1;
        }

        if i == last {
            if let Some(node) = tree.nodes.get_mut(&node_id) {
                node.own_weight += weight;
                node.own_count += 1;
            }
        }

        parent_id = node_id;
    }

    tree.aggregated_samples += 1;
}

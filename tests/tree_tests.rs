use flametree::frame::{FramePolicy, StackFrame};
use flametree::input::StackSample;
use flametree::tree::{build_tree, to_view, NodeId, TreeView};
use pretty_assertions::assert_eq;

fn frame(method: &str) -> StackFrame {
    StackFrame::new("app.Main", method)
}

fn sample(methods: &[&str]) -> StackSample {
    StackSample {
        frames: Some(methods.iter().map(|m| frame(m)).collect()),
        weight: None,
    }
}

fn method_policy() -> FramePolicy {
    FramePolicy::new("method", false).unwrap()
}

/// Find a child view by name, failing loudly when absent
fn child<'a>(view: &'a TreeView, name: &str) -> &'a TreeView {
    view.children
        .as_ref()
        .and_then(|c| c.iter().find(|v| v.name == name))
        .unwrap_or_else(|| panic!("no child named {} under {}", name, view.name))
}

#[test]
fn test_end_to_end_example() {
    // Two samples, [main, foo, bar] and [main, foo, baz], outermost-first
    let samples = vec![sample(&["main", "foo", "bar"]), sample(&["main", "foo", "baz"])];
    let tree = build_tree(&samples, &method_policy());

    // root -> main(cum 2) -> foo(cum 2) -> {bar(own 1, cum 1), baz(own 1, cum 1)}
    let main_id = tree.children_of(NodeId::ROOT).next().unwrap();
    let main = tree.node(main_id).unwrap();
    assert_eq!(main.cumulative_count, 2);
    assert_eq!(main.own_count, 0);

    let foo_id = tree.children_of(main_id).next().unwrap();
    let foo = tree.node(foo_id).unwrap();
    assert_eq!(foo.cumulative_count, 2);
    assert_eq!(tree.children_of(foo_id).count(), 2);

    let view = to_view(&tree);
    let main_view = child(&view, "app.Main.main");
    let foo_view = child(main_view, "app.Main.foo");
    assert_eq!(foo_view.value, 0);

    for leaf in ["app.Main.bar", "app.Main.baz"] {
        let leaf_view = child(foo_view, leaf);
        assert_eq!(leaf_view.value, 1);
        assert!(leaf_view.children.is_none(), "leaves must omit children");
    }
}

#[test]
fn test_merge_correctness_over_shared_prefix() {
    // 5 samples all passing through main -> dispatch
    let samples: Vec<StackSample> = (0..5)
        .map(|i| {
            let handler = format!("handler{}", i);
            sample(&["main", "dispatch", handler.as_str()])
        })
        .collect();
    let tree = build_tree(&samples, &method_policy());

    // one node per distinct prefix path: main, dispatch, 5 handlers
    assert_eq!(tree.node_count(), 7);

    let main_id = tree.children_of(NodeId::ROOT).next().unwrap();
    let dispatch_id = tree.children_of(main_id).next().unwrap();
    let dispatch = tree.node(dispatch_id).unwrap();
    assert_eq!(dispatch.cumulative_count, 5);
    assert_eq!(tree.children_of(dispatch_id).count(), 5);
}

#[test]
fn test_own_never_exceeds_cumulative() {
    let samples = vec![
        sample(&["main"]),
        sample(&["main", "foo"]),
        sample(&["main", "foo", "bar"]),
        sample(&["main", "qux"]),
    ];
    let tree = build_tree(&samples, &method_policy());

    let mut pending = vec![NodeId::ROOT];
    while let Some(id) = pending.pop() {
        for node_id in tree.children_of(id) {
            let node = tree.node(node_id).unwrap();
            assert!(node.own_count <= node.cumulative_count);

            let child_sum: u64 = tree
                .children_of(node_id)
                .filter_map(|c| tree.node(c))
                .map(|c| c.cumulative_count)
                .sum();
            assert!(node.cumulative_count >= child_sum);
            pending.push(node_id);
        }
    }
}

#[test]
fn test_skip_on_defect_yields_identical_tree() {
    let valid = vec![sample(&["main", "foo"]), sample(&["main", "bar"])];

    let mut with_defects = valid.clone();
    with_defects.push(StackSample { frames: None, weight: None });
    with_defects.push(sample(&[]));

    let clean_tree = build_tree(&valid, &method_policy());
    let defect_tree = build_tree(&with_defects, &method_policy());

    assert_eq!(to_view(&clean_tree), to_view(&defect_tree));
    assert_eq!(defect_tree.skipped_samples(), 2);
}

#[test]
fn test_weighted_samples_accumulate() {
    let samples = vec![
        StackSample {
            frames: Some(vec![frame("main"), frame("io")]),
            weight: Some(10.0),
        },
        StackSample {
            frames: Some(vec![frame("main"), frame("io")]),
            weight: Some(5.0),
        },
        StackSample {
            frames: Some(vec![frame("main"), frame("cpu")]),
            weight: None,
        },
    ];
    let tree = build_tree(&samples, &method_policy());

    let main_id = tree.children_of(NodeId::ROOT).next().unwrap();
    let main = tree.node(main_id).unwrap();
    assert_eq!(main.cumulative_weight, 16.0);
    assert_eq!(main.own_weight, 0.0);
    assert_eq!(main.cumulative_count, 3);
}

#[test]
fn test_line_mode_splits_what_method_mode_merges() {
    let a = StackSample {
        frames: Some(vec![frame("main").with_line(10)]),
        weight: None,
    };
    let b = StackSample {
        frames: Some(vec![frame("main").with_line(20)]),
        weight: None,
    };
    let samples = vec![a, b];

    let by_method = build_tree(&samples, &method_policy());
    assert_eq!(by_method.node_count(), 1);

    let by_line = build_tree(&samples, &FramePolicy::new("line", false).unwrap());
    assert_eq!(by_line.node_count(), 2);
}

#[test]
fn test_parent_and_children_are_mutual_inverses() {
    let samples = vec![sample(&["main", "foo", "bar"]), sample(&["main", "qux"])];
    let tree = build_tree(&samples, &method_policy());

    let mut pending: Vec<NodeId> = tree.children_of(NodeId::ROOT).collect();
    for &root_child in &pending {
        assert_eq!(tree.parent_of(root_child), None);
    }
    while let Some(id) = pending.pop() {
        for child_id in tree.children_of(id) {
            assert_eq!(tree.parent_of(child_id), Some(id));
            pending.push(child_id);
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree view basics.
//!
//! Mount a small tree, move a node, and drive the transition frame by frame.
//!
//! Run:
//! - `cargo run -p understory_demos --example tree_view_basics`

use std::time::Duration;

use kurbo::Size;
use understory_scene::RetainedScene;
use understory_tree_view::{TreeNode, TreeView, TreeViewConfig};

fn main() {
    // 1 -> {2, 3}, laid out by hand.
    let mut tree = TreeNode::new(1, 24.0, 48.0)
        .with_child(TreeNode::new(2, 24.0, 48.0).at(-20.0, 80.0))
        .with_child(TreeNode::new(3, 24.0, 48.0).at(20.0, 80.0));

    let scene = RetainedScene::new(Size::new(640.0, 480.0));
    let mut view = TreeView::new(scene, TreeViewConfig::default());
    view.mount(&tree);
    println!(
        "mounted: {} boxes, {} edges",
        view.node_count(),
        view.edge_count()
    );

    // Push node 3 further out; only its box and the 1 -> 3 curve animate.
    tree.find_mut(3).unwrap().geometry.x += 60.0;
    let report = view.sync(&tree);
    println!("sync: {report:?}");
    assert_eq!(report.moved, [3]);

    let edge = view.edge_between(1, 3).unwrap();
    let b = view.box_of(3).unwrap();
    for frame in 1..=8 {
        let now = Duration::from_millis(frame * 80);
        let damage = view.tick(now);
        let scene = view.scene();
        println!(
            "t={:>4}ms box={:?} curve_end={:?} damage={:?}",
            now.as_millis(),
            scene.rect(b).unwrap(),
            scene.curve(edge).unwrap().p3,
            damage.union_rect(),
        );
    }
    assert!(!view.scene().is_animating(b));
    println!("pending fits: {}", view.pending_fits());
}

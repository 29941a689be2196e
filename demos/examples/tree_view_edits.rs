// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree view edits.
//!
//! Grow, reparent and prune a tree across several layout passes and watch the
//! view follow: what each sync changed, how many primitives the scene holds,
//! and where the fitted scale settles.
//!
//! Run:
//! - `cargo run -p understory_demos --example tree_view_edits`

use std::time::Duration;

use kurbo::Size;
use understory_scene::{RetainedScene, Scene};
use understory_tree_view::{LayoutNode, Theme, TreeNode, TreeView, TreeViewConfig, visit};

/// Stand-in for a layout engine: depth along `y`, leaves spread evenly along `x`.
fn layout(node: &mut TreeNode, depth: usize, next_leaf: &mut f64) {
    node.geometry.y = depth as f64 * 70.0;
    if node.children.is_empty() {
        node.geometry.x = *next_leaf;
        *next_leaf += 40.0;
        return;
    }
    for child in &mut node.children {
        layout(child, depth + 1, next_leaf);
    }
    let first = node.children[0].geometry.x;
    let last = node.children[node.children.len() - 1].geometry.x;
    node.geometry.x = (first + last) / 2.0;
}

fn relayout(tree: &mut TreeNode) {
    let mut cursor = 0.0;
    layout(tree, 0, &mut cursor);
    // Center the tree on the origin's horizontal line.
    let shift = tree.geometry.x;
    fn offset(n: &mut TreeNode, dx: f64) {
        n.geometry.x -= dx;
        for c in &mut n.children {
            offset(c, dx);
        }
    }
    offset(tree, shift);
}

fn leaf(id: u64) -> TreeNode {
    TreeNode::new(id, 28.0, 50.0)
}

fn settle(view: &mut TreeView<RetainedScene>, clock: &mut Duration) {
    for _ in 0..20 {
        *clock += Duration::from_millis(60);
        let _ = view.tick(*clock);
    }
}

fn summary(view: &TreeView<RetainedScene>, label: &str) {
    let group = view.group().unwrap();
    let scene = view.scene();
    println!(
        "{label:<10} nodes={:<3} edges={:<3} scene_elements={:<3} scale={:.3} bounds={:?}",
        view.node_count(),
        view.edge_count(),
        scene.element_count(),
        scene.scale(group).unwrap(),
        scene.bounding_rect(group),
    );
}

fn main() {
    let config = TreeViewConfig {
        theme: Theme::dark(),
        ..TreeViewConfig::default()
    };
    let mut view = TreeView::new(RetainedScene::new(Size::new(960.0, 540.0)), config);
    let mut clock = Duration::ZERO;

    let mut tree = leaf(0).with_child(leaf(1)).with_child(leaf(2));
    relayout(&mut tree);
    view.mount(&tree);
    settle(&mut view, &mut clock);
    summary(&view, "mount");

    // Grow: a few generations under node 1.
    let mut next = 3;
    for _ in 0..3 {
        let mut leaves = Vec::new();
        visit(&tree, |n| {
            if n.children.is_empty() {
                leaves.push(n.id());
            }
        });
        for id in leaves {
            let parent = tree.find_mut(id).unwrap();
            parent.push_child(leaf(next));
            parent.push_child(leaf(next + 1));
            next += 2;
        }
        relayout(&mut tree);
        let report = view.sync(&tree);
        println!(
            "grow       appeared={:?} moved={}",
            report.appeared,
            report.moved.len()
        );
        settle(&mut view, &mut clock);
        summary(&view, "grow");
    }

    // Reparent the subtree rooted at 3 under node 2.
    let sub = tree.remove(3).unwrap();
    tree.find_mut(2).unwrap().push_child(sub);
    relayout(&mut tree);
    let report = view.sync(&tree);
    println!("reparent   rewired={:?}", report.rewired);
    assert!(view.edge_between(2, 3).is_some());
    settle(&mut view, &mut clock);
    summary(&view, "reparent");

    // Prune everything under node 1.
    tree.find_mut(1).unwrap().children.clear();
    relayout(&mut tree);
    let report = view.sync(&tree);
    println!("prune      removed={:?}", report.removed);
    settle(&mut view, &mut clock);
    summary(&view, "prune");

    view.clear();
    println!(
        "cleared: mounted={} scene_elements={}",
        view.is_mounted(),
        view.scene().element_count()
    );
    assert!(view.scene().viewport().width > 0.0);
    view.dispose();
}

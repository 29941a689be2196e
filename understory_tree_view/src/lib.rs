// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_view --heading-base-level=0

//! Understory Tree View: animated node-link drawing of a laid-out tree.
//!
//! A layout engine assigns every node of a tree a position and extent. This
//! crate turns that into boxes and connecting curves in a retained
//! [`Scene`](understory_scene::Scene), and keeps the drawing in step as the
//! tree is laid out again and again.
//!
//! - [`TreeView::mount`] draws a tree from scratch.
//! - [`TreeView::sync`] diffs a new layout against the drawing by node identity.
//!   New nodes get a box and the curve from their parent, nodes that are gone
//!   lose their box and every curve touching them, and nodes that moved are
//!   animated together with exactly the curves attached to them.
//! - [`TreeView::fit`] scales the diagram so it stays in view; syncs also
//!   schedule a couple of deferred fits that run from [`TreeView::tick`].
//!
//! Underneath, an [`IdentityIndex`] keeps per identity the box handle, the
//! last-seen node, and its edges both ways (as parent and as child). Edges live
//! in one generational arena, so moving a node touches only its own curves.
//!
//! ## Coordinates
//!
//! Layout space is the usual tidy-tree convention: `x` is the breadth axis,
//! `y` the depth axis. The diagram grows left to right, so a node's box spans
//! `y..y + height` horizontally and is centered on `x` vertically. See
//! [`geometry`] for the exact mapping.
//!
//! ## Minimal usage
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Size;
//! use understory_scene::RetainedScene;
//! use understory_tree_view::{TreeNode, TreeView, TreeViewConfig};
//!
//! let mut tree = TreeNode::new(1, 20.0, 40.0)
//!     .with_child(TreeNode::new(2, 20.0, 40.0).at(0.0, 60.0));
//!
//! let mut view = TreeView::new(RetainedScene::new(Size::new(640.0, 480.0)), TreeViewConfig::default());
//! view.mount(&tree);
//!
//! // The layout grew a node.
//! tree.find_mut(2).unwrap().push_child(TreeNode::new(3, 20.0, 40.0).at(0.0, 120.0));
//! let report = view.sync(&tree);
//! assert_eq!(report.appeared, [3]);
//! assert!(view.edge_between(2, 3).is_some());
//!
//! // Drive animations and deferred fits from the host's frame clock.
//! let _damage = view.tick(Duration::from_millis(16));
//! assert_eq!(view.pending_fits(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod fit;
pub mod geometry;
pub mod index;
pub mod node;
pub mod schedule;
pub mod theme;
pub mod view;

pub use fit::{FitConfig, fit_scale};
pub use index::{EdgeId, EdgeRef, IdentityIndex, VisualBox};
pub use node::{LayoutNode, NodeGeometry, NodeSnapshot, TreeNode, visit, visit_with_parent};
pub use schedule::FitSchedule;
pub use theme::{Palette, Theme};
pub use view::{SyncReport, TreeView, TreeViewConfig};

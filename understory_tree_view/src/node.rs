// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-side input: the [`LayoutNode`] trait, an owned [`TreeNode`], and
//! the pre-order [`visit`] traversal.
//!
//! Layout space follows the usual tidy-tree convention: `x` runs along the
//! breadth of the tree (siblings), `y` runs along its depth (generations).
//! The view rotates this by 90° when drawing, see [`crate::geometry`].

use alloc::vec;
use alloc::vec::Vec;

/// Position and extent of a node in layout space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NodeGeometry {
    /// Center of the node along the breadth axis.
    pub x: f64,
    /// Leading edge of the node along the depth axis.
    pub y: f64,
    /// Extent along the breadth axis.
    pub width: f64,
    /// Extent along the depth axis.
    pub height: f64,
}

impl NodeGeometry {
    /// Geometry at the layout origin with the given extent.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// A node of a laid-out tree, as produced by an external layout pass.
///
/// Identities must be unique within a tree and stable across passes for as
/// long as the node exists.
pub trait LayoutNode {
    /// Stable identity.
    fn id(&self) -> u64;

    /// Identity of the parent, `None` for the root.
    fn parent_id(&self) -> Option<u64>;

    /// Laid-out position and extent.
    fn geometry(&self) -> NodeGeometry;

    /// Children in order.
    fn children(&self) -> impl Iterator<Item = &Self>;
}

/// Visit every node under `root` exactly once, parents before children,
/// siblings in order.
pub fn visit<N: LayoutNode>(root: &N, mut f: impl FnMut(&N)) {
    visit_with_parent(root, |node, _| f(node));
}

/// Like [`visit`], also passing the node each one was reached from.
///
/// The parent comes from the traversal itself, so `root` gets `None` even
/// when its [`LayoutNode::parent_id`] names a node outside the subtree.
pub fn visit_with_parent<N: LayoutNode>(root: &N, mut f: impl FnMut(&N, Option<&N>)) {
    let mut stack = vec![(root, None)];
    while let Some((node, parent)) = stack.pop() {
        f(node, parent);
        let first = stack.len();
        stack.extend(node.children().map(|c| (c, Some(node))));
        stack[first..].reverse();
    }
}

/// Owned copy of a node as last seen by a sync pass.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
    /// Identity.
    pub id: u64,
    /// Parent identity.
    pub parent: Option<u64>,
    /// Layout geometry.
    pub geometry: NodeGeometry,
    /// Child identities in order.
    pub children: Vec<u64>,
}

impl NodeSnapshot {
    /// Capture `node`.
    pub fn of<N: LayoutNode>(node: &N) -> Self {
        Self {
            id: node.id(),
            parent: node.parent_id(),
            geometry: node.geometry(),
            children: node.children().map(LayoutNode::id).collect(),
        }
    }

    /// Capture `node` as reached from `parent` during a traversal.
    ///
    /// The recorded parent is `parent`'s identity, whatever `node` reports.
    pub fn in_tree<N: LayoutNode>(node: &N, parent: Option<&N>) -> Self {
        Self {
            parent: parent.map(LayoutNode::id),
            ..Self::of(node)
        }
    }
}

/// A simple owned tree implementing [`LayoutNode`].
///
/// Useful when the layout engine hands back plain data, and for tests.
///
/// ```
/// use understory_tree_view::{LayoutNode, TreeNode, visit};
///
/// let tree = TreeNode::new(0, 10.0, 10.0)
///     .with_child(TreeNode::new(1, 10.0, 10.0).at(-10.0, 20.0))
///     .with_child(TreeNode::new(2, 10.0, 10.0).at(10.0, 20.0));
///
/// let mut order = Vec::new();
/// visit(&tree, |n| order.push(n.id()));
/// assert_eq!(order, [0, 1, 2]);
/// assert_eq!(tree.find(2).and_then(|n| n.parent_id()), Some(0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    /// Identity.
    pub id: u64,
    /// Parent identity, maintained by [`TreeNode::with_child`] and [`TreeNode::push_child`].
    pub parent: Option<u64>,
    /// Layout geometry.
    pub geometry: NodeGeometry,
    /// Children in order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// A childless node at the layout origin.
    pub fn new(id: u64, width: f64, height: f64) -> Self {
        Self {
            id,
            parent: None,
            geometry: NodeGeometry::new(width, height),
            children: Vec::new(),
        }
    }

    /// Place the node at (`x`, `y`) in layout space.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.geometry.x = x;
        self.geometry.y = y;
        self
    }

    /// Append `child` and return `self`.
    pub fn with_child(mut self, child: Self) -> Self {
        self.push_child(child);
        self
    }

    /// Append `child`, pointing its parent at this node.
    pub fn push_child(&mut self, mut child: Self) {
        child.parent = Some(self.id);
        self.children.push(child);
    }

    /// Detach the subtree rooted at `id` from anywhere below this node.
    pub fn remove(&mut self, id: u64) -> Option<Self> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            let mut removed = self.children.remove(pos);
            removed.parent = None;
            return Some(removed);
        }
        self.children.iter_mut().find_map(|c| c.remove(id))
    }

    /// Find the node with identity `id` in this subtree.
    pub fn find(&self, id: u64) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Mutable variant of [`TreeNode::find`].
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

impl LayoutNode for TreeNode {
    fn id(&self) -> u64 {
        self.id
    }

    fn parent_id(&self) -> Option<u64> {
        self.parent
    }

    fn geometry(&self) -> NodeGeometry {
        self.geometry
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity index: what the view knows about each node identity.
//!
//! Per identity the index keeps the last-seen [`NodeSnapshot`], the box
//! primitive drawn for it, and two edge lists: edges where it is the parent
//! (outgoing) and edges where it is the child (incoming). Edges live in a
//! single generational arena, and both lists refer to them by [`EdgeId`], so
//! moving a node touches exactly the curves attached to it.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

use crate::node::NodeSnapshot;

/// Look up `key`, inserting `default()` first if it is missing.
///
/// An existing value is returned untouched and `default` is not called.
pub fn get_or_insert_with<K: Ord, V>(
    map: &mut BTreeMap<K, V>,
    key: K,
    default: impl FnOnce() -> V,
) -> &mut V {
    map.entry(key).or_insert_with(default)
}

/// Identifier for an edge in the arena (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EdgeId(u32, u32);

impl EdgeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One entry of an edge list: the edge and the identity at its other end.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EdgeRef {
    /// The edge.
    pub edge: EdgeId,
    /// Child identity in an outgoing list, parent identity in an incoming one.
    pub peer: u64,
}

/// The box drawn for an identity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisualBox<H> {
    /// Scene handle of the rectangle.
    pub handle: H,
    /// Last rectangle commanded for it (the animation target, not the
    /// in-flight value).
    pub placed: Rect,
}

#[derive(Clone, Debug)]
struct EdgeSlot<H> {
    generation: u32,
    handle: H,
    parent: u64,
    child: u64,
}

/// Identity-keyed bookkeeping over scene handles of type `H`.
#[derive(Clone)]
pub struct IdentityIndex<H> {
    node_map: BTreeMap<u64, NodeSnapshot>,
    rect_map: BTreeMap<u64, VisualBox<H>>,
    line_source_map: BTreeMap<u64, Vec<EdgeRef>>,
    line_target_map: BTreeMap<u64, Vec<EdgeRef>>,
    edges: Vec<Option<EdgeSlot<H>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<H> Default for IdentityIndex<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Debug for IdentityIndex<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityIndex")
            .field("nodes", &self.rect_map.len())
            .field("edges", &self.edge_count())
            .field("edge_slots", &self.edges.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<H> IdentityIndex<H> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            node_map: BTreeMap::new(),
            rect_map: BTreeMap::new(),
            line_source_map: BTreeMap::new(),
            line_target_map: BTreeMap::new(),
            edges: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of identities with a box.
    pub fn len(&self) -> usize {
        self.rect_map.len()
    }

    /// True if no identity is known.
    pub fn is_empty(&self) -> bool {
        self.rect_map.is_empty()
    }

    /// Whether `id` has a box.
    pub fn contains(&self, id: u64) -> bool {
        self.rect_map.contains_key(&id)
    }

    /// Known identities in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.rect_map.keys().copied()
    }

    /// Last-seen snapshot of `id`.
    pub fn snapshot(&self, id: u64) -> Option<&NodeSnapshot> {
        self.node_map.get(&id)
    }

    /// Box drawn for `id`.
    pub fn visual_box(&self, id: u64) -> Option<&VisualBox<H>> {
        self.rect_map.get(&id)
    }

    /// Edges where `id` is the parent, in creation order.
    pub fn outgoing(&self, id: u64) -> &[EdgeRef] {
        self.line_source_map.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Edges where `id` is the child, in creation order.
    pub fn incoming(&self, id: u64) -> &[EdgeRef] {
        self.line_target_map.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// The edge from `parent` to `child`, if one exists.
    pub fn edge_between(&self, parent: u64, child: u64) -> Option<EdgeId> {
        self.outgoing(parent)
            .iter()
            .find(|r| r.peer == child)
            .map(|r| r.edge)
    }

    /// `(parent, child)` identities of a live edge.
    pub fn endpoints(&self, edge: EdgeId) -> Option<(u64, u64)> {
        self.slot(edge).map(|s| (s.parent, s.child))
    }

    /// Every edge touching `id`: outgoing first, then incoming.
    pub fn edges_of(&self, id: u64) -> Vec<EdgeId> {
        self.outgoing(id)
            .iter()
            .chain(self.incoming(id))
            .map(|r| r.edge)
            .collect()
    }

    /// Record a newly drawn identity.
    pub(crate) fn insert(&mut self, snapshot: NodeSnapshot, visual: VisualBox<H>) {
        self.rect_map.insert(snapshot.id, visual);
        self.node_map.insert(snapshot.id, snapshot);
    }

    /// Replace the snapshot of a known identity, returning the previous one.
    pub(crate) fn refresh(&mut self, snapshot: NodeSnapshot) -> Option<NodeSnapshot> {
        self.node_map.insert(snapshot.id, snapshot)
    }

    /// Remember the rect last commanded for `id`.
    pub(crate) fn set_placed(&mut self, id: u64, placed: Rect) {
        if let Some(b) = self.rect_map.get_mut(&id) {
            b.placed = placed;
        }
    }

    /// Drop every entry for `id`, returning its box.
    ///
    /// Edges must have been unlinked first.
    pub(crate) fn forget(&mut self, id: u64) -> Option<VisualBox<H>> {
        self.node_map.remove(&id);
        self.line_source_map.remove(&id);
        self.line_target_map.remove(&id);
        self.rect_map.remove(&id)
    }

    /// Empty the index.
    pub(crate) fn clear(&mut self) {
        self.node_map.clear();
        self.rect_map.clear();
        self.line_source_map.clear();
        self.line_target_map.clear();
        self.edges.clear();
        self.generations.clear();
        self.free_list.clear();
    }

    fn slot(&self, edge: EdgeId) -> Option<&EdgeSlot<H>> {
        let s = self.edges.get(edge.idx())?.as_ref()?;
        (s.generation == edge.1).then_some(s)
    }
}

impl<H: Copy> IdentityIndex<H> {
    /// Scene handle of a live edge.
    pub fn edge_handle(&self, edge: EdgeId) -> Option<H> {
        self.slot(edge).map(|s| s.handle)
    }

    /// Register the curve `handle` as the edge `parent → child`.
    pub(crate) fn link(&mut self, parent: u64, child: u64, handle: H) -> EdgeId {
        let slot = |generation| EdgeSlot {
            generation,
            handle,
            parent,
            child,
        };
        let edge = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.edges[idx] = Some(slot(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EdgeId uses 32-bit indices by design."
            )]
            EdgeId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.edges.push(Some(slot(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EdgeId uses 32-bit indices by design."
            )]
            EdgeId::new((self.edges.len() - 1) as u32, generation)
        };
        get_or_insert_with(&mut self.line_source_map, parent, Vec::new).push(EdgeRef {
            edge,
            peer: child,
        });
        get_or_insert_with(&mut self.line_target_map, child, Vec::new).push(EdgeRef {
            edge,
            peer: parent,
        });
        edge
    }

    /// Remove an edge from the arena and from both endpoint lists.
    ///
    /// Returns its scene handle, or `None` if the edge is already gone.
    pub(crate) fn unlink(&mut self, edge: EdgeId) -> Option<H> {
        self.slot(edge)?;
        let slot = self.edges[edge.idx()].take()?;
        self.free_list.push(edge.idx());
        if let Some(list) = self.line_source_map.get_mut(&slot.parent) {
            list.retain(|r| r.edge != edge);
        }
        if let Some(list) = self.line_target_map.get_mut(&slot.child) {
            list.retain(|r| r.edge != edge);
        }
        Some(slot.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeGeometry;
    use alloc::vec;

    fn snap(id: u64, parent: Option<u64>) -> NodeSnapshot {
        NodeSnapshot {
            id,
            parent,
            geometry: NodeGeometry::new(1.0, 1.0),
            children: Vec::new(),
        }
    }

    fn boxed(handle: u32) -> VisualBox<u32> {
        VisualBox {
            handle,
            placed: Rect::ZERO,
        }
    }

    #[test]
    fn get_or_insert_keeps_existing_value() {
        let mut map = BTreeMap::new();
        get_or_insert_with(&mut map, 1, || vec![1]).push(2);
        let mut called = false;
        get_or_insert_with(&mut map, 1, || {
            called = true;
            vec![9]
        })
        .push(3);
        assert!(!called, "default only runs for missing keys");
        assert_eq!(map[&1], [1, 2, 3]);
    }

    #[test]
    fn link_is_bidirectional() {
        let mut idx = IdentityIndex::new();
        idx.insert(snap(1, None), boxed(10));
        idx.insert(snap(2, Some(1)), boxed(20));
        let e = idx.link(1, 2, 100);
        assert_eq!(idx.outgoing(1), [EdgeRef { edge: e, peer: 2 }]);
        assert_eq!(idx.incoming(2), [EdgeRef { edge: e, peer: 1 }]);
        assert_eq!(idx.edge_between(1, 2), Some(e));
        assert_eq!(idx.endpoints(e), Some((1, 2)));
        assert_eq!(idx.edge_handle(e), Some(100));
    }

    #[test]
    fn unlink_twice_returns_none() {
        let mut idx = IdentityIndex::new();
        let e = idx.link(1, 2, 7_u32);
        assert_eq!(idx.unlink(e), Some(7));
        assert_eq!(idx.unlink(e), None);
        assert!(idx.outgoing(1).is_empty());
        assert!(idx.incoming(2).is_empty());
        assert_eq!(idx.edge_count(), 0);
    }

    #[test]
    fn reused_slot_does_not_alias_stale_edge() {
        let mut idx = IdentityIndex::new();
        let a = idx.link(1, 2, 1_u32);
        let _ = idx.unlink(a);
        let b = idx.link(1, 3, 2_u32);
        assert_ne!(a, b);
        assert_eq!(idx.edge_handle(a), None);
        assert_eq!(idx.unlink(a), None);
        assert_eq!(idx.edge_between(1, 3), Some(b));
    }

    #[test]
    fn forget_drops_all_four_entries() {
        let mut idx = IdentityIndex::new();
        idx.insert(snap(1, None), boxed(10));
        idx.insert(snap(2, Some(1)), boxed(20));
        let e = idx.link(1, 2, 100);
        for edge in idx.edges_of(2) {
            let _ = idx.unlink(edge);
        }
        assert_eq!(idx.forget(2).map(|b| b.handle), Some(20));
        assert!(!idx.contains(2));
        assert!(idx.snapshot(2).is_none());
        assert!(idx.incoming(2).is_empty());
        assert!(idx.outgoing(1).is_empty());
        assert_eq!(idx.endpoints(e), None);
        assert_eq!(idx.ids().collect::<Vec<_>>(), [1]);
    }
}

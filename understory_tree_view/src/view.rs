// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`TreeView`]: owns the scene and keeps it in step with the layout.

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::time::Duration;

use kurbo::{Point, Rect, RoundedRect};
use understory_scene::{Damage, Scene, Transition};

use crate::fit::{FitConfig, fit_scale};
use crate::geometry::{box_rect, curve_for, rect_approx_eq};
use crate::index::{EdgeRef, IdentityIndex, VisualBox};
use crate::node::{LayoutNode, NodeGeometry, NodeSnapshot, visit_with_parent};
use crate::schedule::FitSchedule;
use crate::theme::{Palette, Theme};

/// Construction-time settings of a [`TreeView`].
#[derive(Clone, Debug)]
pub struct TreeViewConfig {
    /// Colors.
    pub theme: Theme,
    /// Fit margins and cap.
    pub fit: FitConfig,
    /// Distance from the viewport's left edge to the diagram origin.
    pub origin_margin: f64,
    /// Corner radius of node boxes.
    pub corner_radius: f64,
    /// Delays after a sync at which the view is fit again.
    pub fit_delays: Vec<Duration>,
}

impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            fit: FitConfig::default(),
            origin_margin: 12.0,
            corner_radius: 4.0,
            fit_delays: vec![Duration::from_millis(500), Duration::from_millis(1000)],
        }
    }
}

/// What a [`TreeView::sync`] pass changed, by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Identities seen for the first time, in traversal order.
    pub appeared: Vec<u64>,
    /// Known identities whose box was re-targeted, in traversal order.
    pub moved: Vec<u64>,
    /// Known identities whose parent changed, in traversal order.
    pub rewired: Vec<u64>,
    /// Identities no longer present, ascending.
    pub removed: Vec<u64>,
}

impl SyncReport {
    /// True if the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty()
            && self.moved.is_empty()
            && self.rewired.is_empty()
            && self.removed.is_empty()
    }
}

/// Animated node-link rendering of a laid-out tree.
///
/// The view draws one rounded box per node and one cubic curve per
/// parent/child link into a single group of its [`Scene`]. After
/// [`mount`](Self::mount), each [`sync`](Self::sync) diffs the new layout
/// against what is on screen by node identity: new nodes get boxes, vanished
/// nodes lose theirs along with every touching curve, and nodes that moved are
/// animated together with exactly the curves attached to them.
///
/// Time is driven by the host through [`tick`](Self::tick).
///
/// ```
/// use core::time::Duration;
/// use kurbo::Size;
/// use understory_scene::RetainedScene;
/// use understory_tree_view::{TreeNode, TreeView, TreeViewConfig};
///
/// let mut tree = TreeNode::new(1, 20.0, 40.0)
///     .with_child(TreeNode::new(2, 20.0, 40.0).at(-15.0, 60.0))
///     .with_child(TreeNode::new(3, 20.0, 40.0).at(15.0, 60.0));
///
/// let scene = RetainedScene::new(Size::new(800.0, 600.0));
/// let mut view = TreeView::new(scene, TreeViewConfig::default());
/// view.mount(&tree);
/// assert_eq!((view.node_count(), view.edge_count()), (3, 2));
///
/// tree.find_mut(3).unwrap().geometry.x += 50.0;
/// let report = view.sync(&tree);
/// assert_eq!(report.moved, [3]);
///
/// let damage = view.tick(Duration::from_millis(16));
/// assert!(damage.union_rect().is_some());
/// ```
pub struct TreeView<S: Scene> {
    scene: S,
    config: TreeViewConfig,
    palette: Palette,
    group: Option<S::Handle>,
    index: IdentityIndex<S::Handle>,
    schedule: FitSchedule,
    clock: Duration,
    disposed: bool,
}

impl<S: Scene> Debug for TreeView<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeView")
            .field("group", &self.group)
            .field("index", &self.index)
            .field("pending_fits", &self.schedule.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<S: Scene> TreeView<S> {
    /// Create an unmounted view drawing into `scene`.
    pub fn new(scene: S, config: TreeViewConfig) -> Self {
        let palette = config.theme.resolve();
        Self {
            scene,
            config,
            palette,
            group: None,
            index: IdentityIndex::new(),
            schedule: FitSchedule::new(),
            clock: Duration::ZERO,
            disposed: false,
        }
    }

    /// Draw `root` from scratch and fit the view to it.
    ///
    /// Every node gets a box and a curve to each of its children. `root` may
    /// be any subtree: it gets no incoming curve whatever its
    /// [`LayoutNode::parent_id`] says. Mounting an already mounted view clears
    /// it first.
    pub fn mount<N: LayoutNode>(&mut self, root: &N) {
        if self.group.is_some() {
            self.clear();
        }
        let group = self.scene.add_group();
        let height = self.scene.viewport().height;
        self.scene
            .set_origin(group, Point::new(self.config.origin_margin, height / 2.0));
        self.group = Some(group);
        visit_with_parent(root, |node, parent| {
            let snapshot = NodeSnapshot::in_tree(node, parent);
            let id = snapshot.id;
            self.add_box(group, snapshot);
            for child in node.children() {
                self.link(group, id, child.id(), &child.geometry());
            }
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = self.index.len(), edges = self.index.edge_count(), "mounted tree view");
        self.fit();
    }

    /// Bring the drawing in line with `root`.
    ///
    /// One pre-order pass creates boxes for new identities (with the curve
    /// from the node they were reached from), re-targets boxes that moved or resized beyond
    /// [`EPSILON`](crate::geometry::EPSILON) together with their curves, and
    /// re-links identities whose parent changed. Identities not reached are
    /// then removed with every curve touching them. Finally the view is fit
    /// immediately and again after each configured delay.
    ///
    /// Does nothing before [`mount`](Self::mount).
    pub fn sync<N: LayoutNode>(&mut self, root: &N) -> SyncReport {
        let mut report = SyncReport::default();
        let Some(group) = self.group else {
            #[cfg(feature = "tracing")]
            tracing::trace!("sync before mount ignored");
            return report;
        };

        let mut stale: BTreeSet<u64> = self.index.ids().collect();
        visit_with_parent(root, |node, parent| {
            let snapshot = NodeSnapshot::in_tree(node, parent);
            stale.remove(&snapshot.id);
            self.update(group, snapshot, &mut report);
        });

        for id in stale {
            self.destroy(id);
            report.removed.push(id);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            appeared = report.appeared.len(),
            moved = report.moved.len(),
            rewired = report.rewired.len(),
            removed = report.removed.len(),
            "synced tree view"
        );

        self.fit();
        self.schedule
            .schedule_after(self.clock, &self.config.fit_delays);
        report
    }

    /// Animate the group's scale so the whole diagram fits the viewport.
    ///
    /// Returns the chosen scale, or `None` when nothing is mounted.
    pub fn fit(&mut self) -> Option<f64> {
        let group = self.group?;
        let bounds = self.scene.bounding_rect(group);
        let scale = fit_scale(bounds, self.scene.viewport(), &self.config.fit);
        self.scene.set_scale(group, scale, Transition::Animate);
        #[cfg(feature = "tracing")]
        tracing::trace!(scale, ?bounds, "fit tree view");
        Some(scale)
    }

    /// Advance the scene to `now`, run fits that came due, and return what
    /// needs repainting.
    ///
    /// Due fits start their animation at `now`, so their damage is reported by
    /// the following tick.
    pub fn tick(&mut self, now: Duration) -> Damage {
        self.clock = self.clock.max(now);
        let damage = self.scene.tick(self.clock);
        if self.schedule.take_due(self.clock) > 0 {
            self.fit();
        }
        damage
    }

    /// Remove every box and curve and the group itself, forget all
    /// identities, and cancel pending fits. The scene stays usable and the
    /// view can be mounted again.
    pub fn clear(&mut self) {
        self.schedule.cancel_all();
        if let Some(group) = self.group.take() {
            self.scene.remove_group(group);
        }
        self.index.clear();
        #[cfg(feature = "tracing")]
        tracing::debug!("cleared tree view");
    }

    /// Clear the view and release the scene.
    ///
    /// Dropping the view has the same effect.
    pub fn dispose(mut self) {
        self.teardown();
    }

    /// Whether [`mount`](Self::mount) has run since the last clear.
    pub fn is_mounted(&self) -> bool {
        self.group.is_some()
    }

    /// The scene being drawn into.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, for host-side changes such as a resize.
    ///
    /// Primitives owned by the view must not be removed through it.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The group holding the diagram, while mounted.
    pub fn group(&self) -> Option<S::Handle> {
        self.group
    }

    /// Settings the view was created with.
    pub fn config(&self) -> &TreeViewConfig {
        &self.config
    }

    /// Configured theme.
    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Colors in use.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Read-only view of the identity bookkeeping.
    pub fn index(&self) -> &IdentityIndex<S::Handle> {
        &self.index
    }

    /// Box handle of `id`.
    pub fn box_of(&self, id: u64) -> Option<S::Handle> {
        self.index.visual_box(id).map(|b| b.handle)
    }

    /// Rectangle last commanded for `id`'s box.
    pub fn placed(&self, id: u64) -> Option<Rect> {
        self.index.visual_box(id).map(|b| b.placed)
    }

    /// Curve handle linking `parent` to `child`.
    pub fn edge_between(&self, parent: u64, child: u64) -> Option<S::Handle> {
        self.index
            .edge_between(parent, child)
            .and_then(|e| self.index.edge_handle(e))
    }

    /// Edges where `id` is the parent.
    pub fn outgoing(&self, id: u64) -> &[EdgeRef] {
        self.index.outgoing(id)
    }

    /// Edges where `id` is the child.
    pub fn incoming(&self, id: u64) -> &[EdgeRef] {
        self.index.incoming(id)
    }

    /// Drawn identities in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.index.ids()
    }

    /// Number of drawn boxes.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Number of drawn curves.
    pub fn edge_count(&self) -> usize {
        self.index.edge_count()
    }

    /// Number of scheduled fits not yet run.
    pub fn pending_fits(&self) -> usize {
        self.schedule.len()
    }

    // --- internals ---

    fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.clear();
        self.scene.dispose();
        self.disposed = true;
        #[cfg(feature = "tracing")]
        tracing::debug!("disposed tree view");
    }

    fn update(&mut self, group: S::Handle, snapshot: NodeSnapshot, report: &mut SyncReport) {
        let id = snapshot.id;
        if !self.index.contains(id) {
            self.appear(group, snapshot);
            report.appeared.push(id);
            return;
        }

        let geometry = snapshot.geometry;
        let parent = snapshot.parent;
        let previous = self.index.refresh(snapshot);
        let rewired = previous.is_none_or(|p| p.parent != parent);
        if rewired {
            self.rewire(group, id, parent, &geometry);
            report.rewired.push(id);
        }
        if self.retarget(id, &geometry, rewired) {
            report.moved.push(id);
        }
    }

    /// Draw a node seen for the first time during a sync, along with the
    /// curve from its parent.
    fn appear(&mut self, group: S::Handle, snapshot: NodeSnapshot) {
        let (id, parent, geometry) = (snapshot.id, snapshot.parent, snapshot.geometry);
        self.add_box(group, snapshot);
        if let Some(parent) = parent {
            self.link(group, parent, id, &geometry);
        }
    }

    fn add_box(&mut self, group: S::Handle, snapshot: NodeSnapshot) {
        let placed = box_rect(&snapshot.geometry);
        let handle = self.scene.add_rect(
            group,
            RoundedRect::from_rect(placed, self.config.corner_radius),
            self.palette.box_style(),
        );
        self.index.insert(snapshot, VisualBox { handle, placed });
    }

    fn link(&mut self, group: S::Handle, parent: u64, child: u64, geometry: &NodeGeometry) {
        let from = self.parent_geometry(parent);
        let curve = self.scene.add_curve(
            group,
            curve_for(&from, geometry),
            self.palette.line_style(),
        );
        self.index.link(parent, child, curve);
    }

    fn rewire(&mut self, group: S::Handle, id: u64, parent: Option<u64>, geometry: &NodeGeometry) {
        let incoming: Vec<_> = self.index.incoming(id).iter().map(|r| r.edge).collect();
        for edge in incoming {
            if let Some(curve) = self.index.unlink(edge) {
                self.scene.remove(curve);
            }
        }
        if let Some(parent) = parent {
            self.link(group, parent, id, geometry);
        }
    }

    /// Animate `id`'s box and its curves if the box changed. Returns whether
    /// it did.
    fn retarget(&mut self, id: u64, geometry: &NodeGeometry, skip_incoming: bool) -> bool {
        let visual = *self
            .index
            .visual_box(id)
            .expect("known identity has a box");
        let target = box_rect(geometry);
        if rect_approx_eq(target, visual.placed) {
            return false;
        }
        self.scene
            .set_rect(visual.handle, target, Transition::Animate);
        self.index.set_placed(id, target);

        for r in self.index.outgoing(id) {
            let child = &self
                .index
                .snapshot(r.peer)
                .expect("edge endpoint has a snapshot")
                .geometry;
            if let Some(curve) = self.index.edge_handle(r.edge) {
                self.scene
                    .set_curve(curve, curve_for(geometry, child), Transition::Animate);
            }
        }
        if !skip_incoming {
            for r in self.index.incoming(id) {
                let parent = &self
                    .index
                    .snapshot(r.peer)
                    .expect("parent synced before child")
                    .geometry;
                if let Some(curve) = self.index.edge_handle(r.edge) {
                    self.scene
                        .set_curve(curve, curve_for(parent, geometry), Transition::Animate);
                }
            }
        }
        true
    }

    fn destroy(&mut self, id: u64) {
        for edge in self.index.edges_of(id) {
            if let Some(curve) = self.index.unlink(edge) {
                self.scene.remove(curve);
            }
        }
        if let Some(visual) = self.index.forget(id) {
            self.scene.remove(visual.handle);
        }
    }

    fn parent_geometry(&self, parent: u64) -> NodeGeometry {
        self.index
            .snapshot(parent)
            .expect("parent synced before child")
            .geometry
    }
}

impl<S: Scene> Drop for TreeView<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

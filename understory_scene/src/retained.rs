// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless retained-mode implementation of [`Scene`].

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Affine, CubicBez, Point, Rect, RoundedRect, RoundedRectRadii, Shape, Size};

use crate::backend::{Scene, Transition};
use crate::damage::Damage;
use crate::style::{BoxStyle, LineStyle};
use crate::tween::Tween;
use crate::util::{transform_rect_bbox, union_opt};

/// Default length of an animated transition.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

/// Identifier for an element of a [`RetainedScene`] (generational).
///
/// Slots are reused after removal with a bumped generation, so a stale id
/// never aliases a newer element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    // Generations start at 1, so this never names a live element.
    const DANGLING: Self = Self(u32::MAX, 0);

    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Changes not yet reported as damage.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct Dirty: u8 {
        const SHAPE     = 0b0000_0001;
        const TRANSFORM = 0b0000_0010;
    }
}

#[derive(Clone, Debug)]
enum Kind {
    Group {
        children: Vec<ElementId>,
        origin: Point,
        scale: Tween<f64>,
    },
    Rect {
        group: ElementId,
        shape: Tween<Rect>,
        radii: RoundedRectRadii,
        style: BoxStyle,
    },
    Curve {
        group: ElementId,
        shape: Tween<CubicBez>,
        style: LineStyle,
    },
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    kind: Kind,
    dirty: Dirty,
    // Viewport-space bounds reported by the last tick.
    painted: Option<Rect>,
}

/// Retained scene with interruptible tweens and damage accounting.
///
/// Time only moves when [`Scene::tick`] is called; animations started between
/// ticks begin at the last tick's timestamp.
///
/// ```
/// use core::time::Duration;
/// use kurbo::{Rect, RoundedRect, Size};
/// use understory_scene::{BoxStyle, RetainedScene, Scene, Transition};
///
/// let mut scene = RetainedScene::new(Size::new(800.0, 600.0));
/// let g = scene.add_group();
/// let r = scene.add_rect(g, RoundedRect::new(0.0, 0.0, 10.0, 10.0, 4.0), BoxStyle::default());
/// scene.set_rect(r, Rect::new(50.0, 0.0, 60.0, 10.0), Transition::Animate);
/// assert!(scene.is_animating(r));
///
/// let damage = scene.tick(Duration::from_millis(500));
/// assert!(!damage.is_empty());
/// assert_eq!(scene.rect(r), Some(Rect::new(50.0, 0.0, 60.0, 10.0)));
/// ```
pub struct RetainedScene {
    elements: Vec<Option<Element>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    groups: Vec<ElementId>,
    viewport: Size,
    clock: Duration,
    duration: Duration,
    // Bounds of elements removed since the last tick.
    removed: Vec<Rect>,
    disposed: bool,
}

impl core::fmt::Debug for RetainedScene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.elements.len();
        let alive = self.elements.iter().filter(|e| e.is_some()).count();
        f.debug_struct("RetainedScene")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("groups", &self.groups.len())
            .field("viewport", &self.viewport)
            .field("clock", &self.clock)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl RetainedScene {
    /// Create an empty scene bound to a surface of `viewport` size.
    pub fn new(viewport: Size) -> Self {
        Self::with_duration(viewport, DEFAULT_DURATION)
    }

    /// Create an empty scene whose animated transitions last `duration`.
    pub fn with_duration(viewport: Size, duration: Duration) -> Self {
        Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            groups: Vec::new(),
            viewport,
            clock: Duration::ZERO,
            duration,
            removed: Vec::new(),
            disposed: false,
        }
    }

    /// Resize the surface.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Timestamp of the last tick.
    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Whether [`Scene::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of live elements, groups included.
    pub fn element_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_some()).count()
    }

    /// Top-level groups in creation order.
    pub fn groups(&self) -> &[ElementId] {
        &self.groups
    }

    /// Primitives of a group in insertion order. Empty for anything else.
    pub fn children(&self, group: ElementId) -> &[ElementId] {
        match self.get(group).map(|e| &e.kind) {
            Some(Kind::Group { children, .. }) => children,
            _ => &[],
        }
    }

    /// Whether `id` refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Current (sampled) rectangle of a rect element.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        match self.get(id)?.kind {
            Kind::Rect { shape, .. } => Some(shape.sample(self.clock)),
            _ => None,
        }
    }

    /// Rectangle a rect element is heading to.
    pub fn rect_target(&self, id: ElementId) -> Option<Rect> {
        match self.get(id)?.kind {
            Kind::Rect { shape, .. } => Some(shape.target()),
            _ => None,
        }
    }

    /// Current rounded rectangle of a rect element.
    pub fn rounded_rect(&self, id: ElementId) -> Option<RoundedRect> {
        match self.get(id)?.kind {
            Kind::Rect { shape, radii, .. } => {
                Some(RoundedRect::from_rect(shape.sample(self.clock), radii))
            }
            _ => None,
        }
    }

    /// Style of a rect element.
    pub fn box_style(&self, id: ElementId) -> Option<BoxStyle> {
        match self.get(id)?.kind {
            Kind::Rect { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Current (sampled) shape of a curve element.
    pub fn curve(&self, id: ElementId) -> Option<CubicBez> {
        match self.get(id)?.kind {
            Kind::Curve { shape, .. } => Some(shape.sample(self.clock)),
            _ => None,
        }
    }

    /// Shape a curve element is heading to.
    pub fn curve_target(&self, id: ElementId) -> Option<CubicBez> {
        match self.get(id)?.kind {
            Kind::Curve { shape, .. } => Some(shape.target()),
            _ => None,
        }
    }

    /// Style of a curve element.
    pub fn line_style(&self, id: ElementId) -> Option<LineStyle> {
        match self.get(id)?.kind {
            Kind::Curve { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Origin of a group.
    pub fn origin(&self, group: ElementId) -> Option<Point> {
        match self.get(group)?.kind {
            Kind::Group { origin, .. } => Some(origin),
            _ => None,
        }
    }

    /// Current (sampled) scale of a group.
    pub fn scale(&self, group: ElementId) -> Option<f64> {
        match &self.get(group)?.kind {
            Kind::Group { scale, .. } => Some(scale.sample(self.clock)),
            _ => None,
        }
    }

    /// Scale a group is heading to.
    pub fn scale_target(&self, group: ElementId) -> Option<f64> {
        match &self.get(group)?.kind {
            Kind::Group { scale, .. } => Some(scale.target()),
            _ => None,
        }
    }

    /// Whether any property of the element is mid-animation.
    pub fn is_animating(&self, id: ElementId) -> bool {
        match self.get(id).map(|e| &e.kind) {
            Some(Kind::Group { scale, .. }) => scale.is_animating(),
            Some(Kind::Rect { shape, .. }) => shape.is_animating(),
            Some(Kind::Curve { shape, .. }) => shape.is_animating(),
            None => false,
        }
    }

    /// Number of elements with an animation in flight.
    pub fn animating_count(&self) -> usize {
        self.live_ids().filter(|&id| self.is_animating(id)).count()
    }

    // --- internals ---

    fn live_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().enumerate().filter_map(|(i, e)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            e.as_ref().map(|e| ElementId::new(i as u32, e.generation))
        })
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        let e = self.elements.get(id.idx())?.as_ref()?;
        (e.generation == id.1).then_some(e)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let e = self.elements.get_mut(id.idx())?.as_mut()?;
        (e.generation == id.1).then_some(e)
    }

    fn is_group(&self, id: ElementId) -> bool {
        matches!(self.get(id).map(|e| &e.kind), Some(Kind::Group { .. }))
    }

    fn alloc(&mut self, kind: Kind) -> ElementId {
        let element = |generation| Element {
            generation,
            kind,
            dirty: Dirty::SHAPE,
            painted: None,
        };
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(element(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ElementId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(element(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ElementId::new((self.elements.len() - 1) as u32, generation)
        }
    }

    fn free(&mut self, id: ElementId) {
        if let Some(e) = self.elements[id.idx()].take()
            && let Some(r) = e.painted
        {
            self.removed.push(r);
        }
        self.free_list.push(id.idx());
    }

    fn add_primitive(&mut self, group: ElementId, kind: Kind) -> ElementId {
        if self.disposed || !self.is_group(group) {
            self.ignored("add_primitive", group);
            return ElementId::DANGLING;
        }
        let id = self.alloc(kind);
        if let Some(Kind::Group { children, .. }) = self.get_mut(group).map(|e| &mut e.kind) {
            children.push(id);
        }
        id
    }

    fn ignored(&self, _op: &str, _id: ElementId) {
        #[cfg(feature = "tracing")]
        tracing::trace!(op = _op, element = ?_id, disposed = self.disposed, "ignored scene operation");
    }

    fn group_affine(&self, group: ElementId) -> Affine {
        match self.get(group).map(|e| &e.kind) {
            Some(Kind::Group { origin, scale, .. }) => {
                Affine::translate(origin.to_vec2()) * Affine::scale(scale.sample(self.clock))
            }
            _ => Affine::IDENTITY,
        }
    }

    /// Local bounds of a primitive at the current clock.
    fn local_bounds(&self, id: ElementId) -> Option<Rect> {
        match &self.get(id)?.kind {
            Kind::Rect { shape, .. } => Some(shape.sample(self.clock)),
            Kind::Curve { shape, .. } => Some(shape.sample(self.clock).bounding_box()),
            Kind::Group { .. } => None,
        }
    }
}

impl Scene for RetainedScene {
    type Handle = ElementId;

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn add_group(&mut self) -> ElementId {
        if self.disposed {
            self.ignored("add_group", ElementId::DANGLING);
            return ElementId::DANGLING;
        }
        let id = self.alloc(Kind::Group {
            children: Vec::new(),
            origin: Point::ZERO,
            scale: Tween::new(1.0),
        });
        self.groups.push(id);
        id
    }

    fn remove_group(&mut self, group: ElementId) {
        let children = match self.get_mut(group).map(|e| &mut e.kind) {
            Some(Kind::Group { children, .. }) => core::mem::take(children),
            _ => return self.ignored("remove_group", group),
        };
        for child in children {
            self.free(child);
        }
        self.groups.retain(|g| *g != group);
        self.free(group);
    }

    fn set_origin(&mut self, group: ElementId, to: Point) {
        match self.get_mut(group) {
            Some(Element {
                kind: Kind::Group { origin, .. },
                dirty,
                ..
            }) => {
                *origin = to;
                *dirty |= Dirty::TRANSFORM;
            }
            _ => self.ignored("set_origin", group),
        }
    }

    fn set_scale(&mut self, group: ElementId, to: f64, transition: Transition) {
        let (now, duration) = (self.clock, self.duration);
        match self.get_mut(group) {
            Some(Element {
                kind: Kind::Group { scale, .. },
                dirty,
                ..
            }) => {
                match transition {
                    Transition::Immediate => scale.set(to),
                    Transition::Animate => scale.animate_to(to, now, duration),
                }
                *dirty |= Dirty::TRANSFORM;
            }
            _ => self.ignored("set_scale", group),
        }
    }

    fn add_rect(&mut self, group: ElementId, shape: RoundedRect, style: BoxStyle) -> ElementId {
        self.add_primitive(
            group,
            Kind::Rect {
                group,
                shape: Tween::new(shape.rect()),
                radii: shape.radii(),
                style,
            },
        )
    }

    fn add_curve(&mut self, group: ElementId, shape: CubicBez, style: LineStyle) -> ElementId {
        self.add_primitive(
            group,
            Kind::Curve {
                group,
                shape: Tween::new(shape),
                style,
            },
        )
    }

    fn set_rect(&mut self, rect: ElementId, to: Rect, transition: Transition) {
        let (now, duration) = (self.clock, self.duration);
        match self.get_mut(rect) {
            Some(Element {
                kind: Kind::Rect { shape, .. },
                dirty,
                ..
            }) => {
                match transition {
                    Transition::Immediate => shape.set(to),
                    Transition::Animate => shape.animate_to(to, now, duration),
                }
                *dirty |= Dirty::SHAPE;
            }
            _ => self.ignored("set_rect", rect),
        }
    }

    fn set_curve(&mut self, curve: ElementId, to: CubicBez, transition: Transition) {
        let (now, duration) = (self.clock, self.duration);
        match self.get_mut(curve) {
            Some(Element {
                kind: Kind::Curve { shape, .. },
                dirty,
                ..
            }) => {
                match transition {
                    Transition::Immediate => shape.set(to),
                    Transition::Animate => shape.animate_to(to, now, duration),
                }
                *dirty |= Dirty::SHAPE;
            }
            _ => self.ignored("set_curve", curve),
        }
    }

    fn remove(&mut self, element: ElementId) {
        let group = match self.get(element).map(|e| &e.kind) {
            Some(Kind::Rect { group, .. } | Kind::Curve { group, .. }) => *group,
            Some(Kind::Group { .. }) => return self.remove_group(element),
            None => return self.ignored("remove", element),
        };
        if let Some(Kind::Group { children, .. }) = self.get_mut(group).map(|e| &mut e.kind) {
            children.retain(|c| *c != element);
        }
        self.free(element);
    }

    fn bounding_rect(&self, group: ElementId) -> Rect {
        let mut acc = None;
        for &child in self.children(group) {
            if let Some(b) = self.local_bounds(child) {
                acc = Some(union_opt(acc, b));
            }
        }
        acc.unwrap_or(Rect::ZERO)
    }

    fn tick(&mut self, now: Duration) -> Damage {
        let mut damage = Damage::default();
        if self.disposed {
            return damage;
        }
        self.clock = self.clock.max(now);
        let clock = self.clock;

        for gi in 0..self.groups.len() {
            let group = self.groups[gi];
            let (children, moved) = {
                let Some(g) = self.get_mut(group) else {
                    continue;
                };
                let Kind::Group {
                    children, scale, ..
                } = &mut g.kind
                else {
                    continue;
                };
                let moved = g.dirty.contains(Dirty::TRANSFORM) || scale.is_animating();
                scale.settle(clock);
                g.dirty = Dirty::empty();
                (children.clone(), moved)
            };
            let affine = self.group_affine(group);

            for child in children {
                let Some(e) = self.get_mut(child) else {
                    continue;
                };
                let (animating, is_curve) = match &mut e.kind {
                    Kind::Rect { shape, .. } => {
                        let animating = shape.is_animating();
                        shape.settle(clock);
                        (animating, false)
                    }
                    Kind::Curve { shape, .. } => {
                        let animating = shape.is_animating();
                        shape.settle(clock);
                        (animating, true)
                    }
                    Kind::Group { .. } => (false, false),
                };
                if !(animating || moved || !e.dirty.is_empty()) {
                    continue;
                }
                e.dirty = Dirty::empty();
                let old = e.painted;
                let new = self.local_bounds(child).map(|local| {
                    let world = transform_rect_bbox(affine, local);
                    // Curves are stroked; keep straight lines from collapsing.
                    if is_curve { world.inflate(1.0, 1.0) } else { world }
                });
                if let Some(e) = self.get_mut(child) {
                    e.painted = new;
                }
                damage.push_pair(old, new);
            }
        }

        damage.dirty_rects.append(&mut self.removed);
        damage
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(elements = self.element_count(), "disposing retained scene");
        self.elements.clear();
        self.generations.clear();
        self.free_list.clear();
        self.groups.clear();
        self.removed.clear();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scene() -> RetainedScene {
        RetainedScene::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn group_collects_primitives_and_bounds() {
        let mut s = scene();
        let g = s.add_group();
        let a = s.add_rect(g, RoundedRect::new(0.0, -5.0, 10.0, 5.0, 4.0), BoxStyle::default());
        let c = s.add_curve(
            g,
            CubicBez::new((10.0, 0.0), (20.0, 0.0), (20.0, 40.0), (30.0, 40.0)),
            LineStyle::default(),
        );
        assert_eq!(s.children(g), &[a, c]);
        assert_eq!(s.bounding_rect(g), Rect::new(0.0, -5.0, 30.0, 40.0));
        assert_eq!(s.rounded_rect(a).map(|r| r.radii().top_left), Some(4.0));
    }

    #[test]
    fn empty_group_bounds_are_zero() {
        let mut s = scene();
        let g = s.add_group();
        assert_eq!(s.bounding_rect(g), Rect::ZERO);
    }

    #[test]
    fn animated_rect_reports_damage_until_settled() {
        let mut s = scene();
        let g = s.add_group();
        let r = s.add_rect(g, RoundedRect::new(0.0, 0.0, 10.0, 10.0, 0.0), BoxStyle::default());
        let first = s.tick(ms(0));
        assert_eq!(first.dirty_rects, [Rect::new(0.0, 0.0, 10.0, 10.0)]);

        s.set_rect(r, Rect::new(100.0, 0.0, 110.0, 10.0), Transition::Animate);
        assert!(s.is_animating(r));
        let mid = s.tick(ms(250));
        assert_eq!(mid.dirty_rects.len(), 2, "old and new extent");
        assert!(s.is_animating(r));

        let end = s.tick(ms(500));
        assert!(!end.is_empty());
        assert!(!s.is_animating(r));
        assert_eq!(s.rect(r), Some(Rect::new(100.0, 0.0, 110.0, 10.0)));

        assert!(s.tick(ms(600)).is_empty(), "idle scene reports nothing");
    }

    #[test]
    fn immediate_set_skips_animation() {
        let mut s = scene();
        let g = s.add_group();
        let r = s.add_rect(g, RoundedRect::new(0.0, 0.0, 10.0, 10.0, 0.0), BoxStyle::default());
        s.set_rect(r, Rect::new(5.0, 5.0, 15.0, 15.0), Transition::Immediate);
        assert!(!s.is_animating(r));
        assert_eq!(s.rect(r), Some(Rect::new(5.0, 5.0, 15.0, 15.0)));
    }

    #[test]
    fn group_transform_maps_damage_to_viewport() {
        let mut s = scene();
        let g = s.add_group();
        s.set_origin(g, Point::new(12.0, 300.0));
        s.set_scale(g, 2.0, Transition::Immediate);
        let _r = s.add_rect(g, RoundedRect::new(0.0, -5.0, 10.0, 5.0, 0.0), BoxStyle::default());
        let d = s.tick(ms(0));
        assert_eq!(d.union_rect(), Some(Rect::new(12.0, 290.0, 32.0, 310.0)));
        // Local bounds ignore the group transform.
        assert_eq!(s.bounding_rect(g), Rect::new(0.0, -5.0, 10.0, 5.0));
    }

    #[test]
    fn removal_reports_painted_bounds_and_frees_slot() {
        let mut s = scene();
        let g = s.add_group();
        let r = s.add_rect(g, RoundedRect::new(0.0, 0.0, 10.0, 10.0, 0.0), BoxStyle::default());
        let _ = s.tick(ms(0));
        s.remove(r);
        assert!(!s.contains(r));
        assert!(s.children(g).is_empty());
        let d = s.tick(ms(16));
        assert_eq!(d.dirty_rects, [Rect::new(0.0, 0.0, 10.0, 10.0)]);

        // Slot reuse bumps the generation; the stale id stays dead.
        let r2 = s.add_rect(g, RoundedRect::new(0.0, 0.0, 1.0, 1.0, 0.0), BoxStyle::default());
        assert_ne!(r, r2);
        assert!(s.rect(r).is_none());
        s.set_rect(r, Rect::new(0.0, 0.0, 2.0, 2.0), Transition::Immediate);
        assert_eq!(s.rect(r2), Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn remove_group_drops_children() {
        let mut s = scene();
        let g = s.add_group();
        let r = s.add_rect(g, RoundedRect::new(0.0, 0.0, 10.0, 10.0, 0.0), BoxStyle::default());
        let c = s.add_curve(g, CubicBez::new((0., 0.), (1., 0.), (1., 1.), (2., 1.)), LineStyle::default());
        s.remove_group(g);
        assert!(!s.contains(r) && !s.contains(c) && !s.contains(g));
        assert!(s.groups().is_empty());
        assert_eq!(s.element_count(), 0);
    }

    #[test]
    fn scale_animates_and_retargets() {
        let mut s = scene();
        let g = s.add_group();
        s.set_scale(g, 3.0, Transition::Animate);
        assert_eq!(s.scale(g), Some(1.0));
        let _ = s.tick(ms(250));
        let mid = s.scale(g).unwrap();
        assert!(mid > 1.0 && mid < 3.0);
        s.set_scale(g, 2.0, Transition::Animate);
        assert_eq!(s.scale(g), Some(mid));
        assert_eq!(s.scale_target(g), Some(2.0));
        let _ = s.tick(ms(750));
        assert_eq!(s.scale(g), Some(2.0));
    }

    #[test]
    fn disposed_scene_ignores_ticks() {
        let mut s = scene();
        let g = s.add_group();
        let _ = s.add_rect(g, RoundedRect::new(0.0, 0.0, 10.0, 10.0, 0.0), BoxStyle::default());
        s.dispose();
        assert!(s.is_disposed());
        assert_eq!(s.element_count(), 0);
        assert!(s.tick(ms(10)).is_empty());
        s.set_scale(g, 2.0, Transition::Animate);
        assert!(s.scale(g).is_none());

        let late = s.add_group();
        assert!(!s.contains(late));
        assert_eq!(s.element_count(), 0);
    }

    #[test]
    fn adding_to_a_removed_group_is_ignored() {
        let mut s = scene();
        let g = s.add_group();
        s.remove_group(g);
        let r = s.add_rect(g, RoundedRect::new(0.0, 0.0, 1.0, 1.0, 0.0), BoxStyle::default());
        assert!(!s.contains(r));
        s.set_rect(r, Rect::new(0.0, 0.0, 2.0, 2.0), Transition::Animate);
        assert_eq!(s.element_count(), 0);
    }
}

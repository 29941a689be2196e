// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Scene` trait: the rendering-engine seam consumed by higher layers.

use core::fmt::Debug;
use core::time::Duration;

use kurbo::{CubicBez, Point, Rect, RoundedRect, Size};

use crate::damage::Damage;
use crate::style::{BoxStyle, LineStyle};

/// How a geometry change is applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Jump to the new value.
    #[default]
    Immediate,
    /// Tween from the current value to the new one.
    ///
    /// If a tween is already in flight it is re-targeted from its current
    /// sampled value; nothing is queued.
    Animate,
}

/// Retained 2D scene abstraction.
///
/// A scene holds top-level groups; each group holds rectangle and curve
/// primitives in the group's local coordinate space. A group carries an origin
/// and a uniform scale, which map its local space into the viewport.
///
/// Handles are small copyable values. Operations on a handle that no longer
/// refers to a live element are ignored.
pub trait Scene {
    /// Handle for groups and primitives.
    type Handle: Copy + Eq + Debug;

    /// Size of the surface the scene is bound to.
    fn viewport(&self) -> Size;

    /// Create an empty top-level group with origin at zero and scale 1.
    fn add_group(&mut self) -> Self::Handle;

    /// Remove a group and every primitive in it.
    fn remove_group(&mut self, group: Self::Handle);

    /// Place the group's local origin in viewport coordinates.
    fn set_origin(&mut self, group: Self::Handle, origin: Point);

    /// Set the group's uniform scale.
    fn set_scale(&mut self, group: Self::Handle, scale: f64, transition: Transition);

    /// Add a rounded rectangle to `group`.
    fn add_rect(&mut self, group: Self::Handle, shape: RoundedRect, style: BoxStyle)
    -> Self::Handle;

    /// Add a cubic curve to `group`.
    fn add_curve(&mut self, group: Self::Handle, shape: CubicBez, style: LineStyle)
    -> Self::Handle;

    /// Move or resize a rectangle. The corner radius is kept.
    fn set_rect(&mut self, rect: Self::Handle, shape: Rect, transition: Transition);

    /// Reshape a curve.
    fn set_curve(&mut self, curve: Self::Handle, shape: CubicBez, transition: Transition);

    /// Remove a single primitive from its group.
    fn remove(&mut self, element: Self::Handle);

    /// Bounding box of the group's content in its local space, using the
    /// current (possibly mid-animation) geometry.
    ///
    /// Returns [`Rect::ZERO`] for an empty or unknown group.
    fn bounding_rect(&self, group: Self::Handle) -> Rect;

    /// Advance animations to `now` and report the regions that changed since
    /// the previous tick.
    fn tick(&mut self, now: Duration) -> Damage;

    /// Release the engine. Terminal: later calls are ignored.
    fn dispose(&mut self);
}

impl<S: Scene + ?Sized> Scene for &mut S {
    type Handle = S::Handle;

    fn viewport(&self) -> Size {
        (**self).viewport()
    }

    fn add_group(&mut self) -> Self::Handle {
        (**self).add_group()
    }

    fn remove_group(&mut self, group: Self::Handle) {
        (**self).remove_group(group);
    }

    fn set_origin(&mut self, group: Self::Handle, origin: Point) {
        (**self).set_origin(group, origin);
    }

    fn set_scale(&mut self, group: Self::Handle, scale: f64, transition: Transition) {
        (**self).set_scale(group, scale, transition);
    }

    fn add_rect(
        &mut self,
        group: Self::Handle,
        shape: RoundedRect,
        style: BoxStyle,
    ) -> Self::Handle {
        (**self).add_rect(group, shape, style)
    }

    fn add_curve(
        &mut self,
        group: Self::Handle,
        shape: CubicBez,
        style: LineStyle,
    ) -> Self::Handle {
        (**self).add_curve(group, shape, style)
    }

    fn set_rect(&mut self, rect: Self::Handle, shape: Rect, transition: Transition) {
        (**self).set_rect(rect, shape, transition);
    }

    fn set_curve(&mut self, curve: Self::Handle, shape: CubicBez, transition: Transition) {
        (**self).set_curve(curve, shape, transition);
    }

    fn remove(&mut self, element: Self::Handle) {
        (**self).remove(element);
    }

    fn bounding_rect(&self, group: Self::Handle) -> Rect {
        (**self).bounding_rect(group)
    }

    fn tick(&mut self, now: Duration) -> Damage {
        (**self).tick(now)
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}

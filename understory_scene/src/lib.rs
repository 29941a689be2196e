// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scene --heading-base-level=0

//! Understory Scene: the retained 2D scene seam used by Understory views.
//!
//! Higher layers (for example a tree diagram that keeps visuals in step with a
//! changing layout) talk to a rendering engine through the [`Scene`] trait:
//! create groups, put rectangles and cubic curves in them, re-target their
//! geometry immediately or with an animated [`Transition`], ask for a group's
//! bounding box, and advance time with [`Scene::tick`].
//!
//! This crate also ships [`RetainedScene`], a headless implementation that keeps
//! everything in memory. It is what tests, benchmarks and demos run against, and
//! a reasonable starting point for adapting a real renderer: feed its current
//! geometry to your painter and use the returned [`Damage`] to bound repaints.
//!
//! ## Animation model
//!
//! Every animated property is a [`Tween`](tween::Tween): idle at a value, or
//! animating from a start value to a target. Setting a new target mid-flight
//! starts a new leg from the currently sampled value. There is no queue and
//! nothing to cancel, so callers can re-target as often as they like.
//!
//! ## Not a painter
//!
//! Nothing here rasterizes. Styles carry [`peniko::Color`]s for whoever paints.
//!
//! ## Minimal usage
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{CubicBez, Point, Rect, RoundedRect, Size};
//! use understory_scene::{BoxStyle, LineStyle, RetainedScene, Scene, Transition};
//!
//! let mut scene = RetainedScene::new(Size::new(640.0, 480.0));
//! let group = scene.add_group();
//! scene.set_origin(group, Point::new(12.0, 240.0));
//!
//! let a = scene.add_rect(group, RoundedRect::new(0.0, -10.0, 40.0, 10.0, 4.0), BoxStyle::default());
//! let _edge = scene.add_curve(
//!     group,
//!     CubicBez::new((40.0, 0.0), (60.0, 0.0), (60.0, 30.0), (80.0, 30.0)),
//!     LineStyle::default(),
//! );
//! assert_eq!(scene.bounding_rect(group), Rect::new(0.0, -10.0, 80.0, 30.0));
//!
//! scene.set_rect(a, Rect::new(0.0, 20.0, 40.0, 40.0), Transition::Animate);
//! let damage = scene.tick(Duration::from_millis(16));
//! assert!(damage.union_rect().is_some());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod damage;
pub mod retained;
pub mod style;
pub mod tween;

mod util;

pub use backend::{Scene, Transition};
pub use damage::Damage;
pub use retained::{DEFAULT_DURATION, ElementId, RetainedScene};
pub use style::{BoxStyle, LineStyle};
pub use tween::{Lerp, Tween};

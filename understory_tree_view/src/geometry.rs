// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout space → drawing space.
//!
//! The diagram grows left to right: layout depth (`y`) becomes the drawing's
//! horizontal axis and layout breadth (`x`) its vertical axis. Boxes are
//! centered on their breadth coordinate.

use kurbo::{CubicBez, Point, Rect};

use crate::node::NodeGeometry;

/// Coordinates closer than this are treated as equal by [`approx_eq`].
pub const EPSILON: f64 = 1e-6;

/// Whether `a` and `b` differ by at most [`EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (-EPSILON..=EPSILON).contains(&(a - b))
}

/// [`approx_eq`] on all four coordinates.
pub fn rect_approx_eq(a: Rect, b: Rect) -> bool {
    approx_eq(a.x0, b.x0) && approx_eq(a.y0, b.y0) && approx_eq(a.x1, b.x1) && approx_eq(a.y1, b.y1)
}

/// Drawing-space box of a node.
pub fn box_rect(node: &NodeGeometry) -> Rect {
    let half = node.width / 2.0;
    Rect::new(node.y, node.x - half, node.y + node.height, node.x + half)
}

/// Curve linking `parent`'s trailing edge to `child`'s leading edge.
///
/// Both control points sit halfway between the two edges, each level with its
/// own endpoint, giving a symmetric S-curve.
pub fn curve_for(parent: &NodeGeometry, child: &NodeGeometry) -> CubicBez {
    let start = parent.y + parent.height;
    let mid = (start + child.y) / 2.0;
    CubicBez::new(
        Point::new(start, parent.x),
        Point::new(mid, parent.x),
        Point::new(mid, child.x),
        Point::new(child.y, child.x),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64, width: f64, height: f64) -> NodeGeometry {
        NodeGeometry {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn box_swaps_axes_and_centers_on_breadth() {
        let r = box_rect(&node(10.0, 40.0, 6.0, 20.0));
        assert_eq!(r, Rect::new(40.0, 7.0, 60.0, 13.0));
    }

    #[test]
    fn curve_runs_between_facing_edges() {
        let parent = node(0.0, 0.0, 10.0, 20.0);
        let child = node(30.0, 50.0, 10.0, 20.0);
        let c = curve_for(&parent, &child);
        assert_eq!(c.p0, Point::new(20.0, 0.0));
        assert_eq!(c.p1, Point::new(35.0, 0.0));
        assert_eq!(c.p2, Point::new(35.0, 30.0));
        assert_eq!(c.p3, Point::new(50.0, 30.0));
    }

    #[test]
    fn curve_is_deterministic() {
        let parent = node(3.0, 1.0, 2.0, 2.0);
        let child = node(-4.0, 9.0, 2.0, 2.0);
        assert_eq!(curve_for(&parent, &child), curve_for(&parent, &child));
    }

    #[test]
    fn tolerance_boundary() {
        assert!(approx_eq(0.0, 1e-6));
        assert!(approx_eq(-1e-6, 0.0));
        assert!(!approx_eq(0.0, 1e-5));
        assert!(!approx_eq(100.0, 100.00001));
    }

    #[test]
    fn rect_compare_covers_extent() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_approx_eq(a, Rect::new(0.0, 0.0, 10.0, 10.0 + 1e-7)));
        assert!(!rect_approx_eq(a, Rect::new(0.0, 0.0, 12.0, 10.0)));
    }
}

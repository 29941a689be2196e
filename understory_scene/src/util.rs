// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect};

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box in the target space.
pub(crate) fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let p0 = affine * Point::new(rect.x0, rect.y0);
    let p1 = affine * Point::new(rect.x1, rect.y0);
    let p2 = affine * Point::new(rect.x0, rect.y1);
    let p3 = affine * Point::new(rect.x1, rect.y1);
    let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
    let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
    let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
    let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Union of an optional accumulator with `r`.
pub(crate) fn union_opt(acc: Option<Rect>, r: Rect) -> Rect {
    match acc {
        Some(a) => a.union(r),
        None => r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn translate_then_scale_maps_corners() {
        let tf = Affine::translate(Vec2::new(12.0, 300.0)) * Affine::scale(2.0);
        let r = transform_rect_bbox(tf, Rect::new(0.0, -10.0, 5.0, 10.0));
        assert_eq!(r, Rect::new(12.0, 280.0, 22.0, 320.0));
    }

    #[test]
    fn union_starts_from_first_rect() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(union_opt(None, a), a);
        assert_eq!(
            union_opt(Some(a), Rect::new(2.0, 2.0, 3.0, 3.0)),
            Rect::new(0.0, 0.0, 3.0, 3.0)
        );
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale selection so the whole diagram stays visible.

use kurbo::{Rect, Size};

/// Margins and cap used by [`fit_scale`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitConfig {
    /// Extra horizontal room added to the content width.
    pub horizontal_margin: f64,
    /// Extra vertical room added to the content height.
    pub vertical_margin: f64,
    /// Upper bound on the scale.
    pub max_scale: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            horizontal_margin: 20.0,
            vertical_margin: 50.0,
            max_scale: 5.0,
        }
    }
}

// Denominators at or below this impose no constraint.
const FLOOR: f64 = 1e-9;

fn ratio(num: f64, den: f64) -> Option<f64> {
    (den > FLOOR).then(|| num / den)
}

/// Scale for content with local `bounds` drawn in a `viewport`, when the
/// group origin sits on the viewport's left edge, vertically centered.
///
/// Horizontally, the content left and right of the origin each get half the
/// viewport width, and the full width must fit the content plus margin.
/// Vertically the content plus margin must fit the height. The result never
/// exceeds `max_scale`; degenerate content yields `max_scale`.
///
/// Content lying wholly on one side of the origin is bounded by its far edge.
/// The near side's extent is then negative and imposes nothing; its magnitude
/// is never larger than the far edge's, so it could not tighten the result.
///
/// ```
/// use kurbo::{Rect, Size};
/// use understory_tree_view::{FitConfig, fit_scale};
///
/// let s = fit_scale(Rect::new(0.0, -50.0, 1000.0, 50.0), Size::new(500.0, 500.0), &FitConfig::default());
/// assert_eq!(s, 0.25);
/// ```
pub fn fit_scale(bounds: Rect, viewport: Size, config: &FitConfig) -> f64 {
    let half = viewport.width / 2.0;
    let leading = -bounds.x0;
    let trailing = bounds.x0 + bounds.width();
    let terms = [
        ratio(half, leading),
        ratio(half, trailing),
        ratio(viewport.width, bounds.width() + config.horizontal_margin),
        ratio(viewport.height, bounds.height() + config.vertical_margin),
    ];
    let scale = terms
        .into_iter()
        .flatten()
        .fold(config.max_scale, f64::min);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        config.max_scale
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint styles for scene primitives.

use peniko::Color;

/// Style of a filled, outlined rectangle.
#[derive(Copy, Clone, Debug)]
pub struct BoxStyle {
    /// Interior color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            stroke: Color::BLACK,
        }
    }
}

/// Style of a stroked curve.
#[derive(Copy, Clone, Debug)]
pub struct LineStyle {
    /// Stroke color.
    pub stroke: Color,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
        }
    }
}

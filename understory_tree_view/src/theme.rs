// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram colors.

use peniko::Color;
use understory_scene::{BoxStyle, LineStyle};

/// Color configuration accepted at construction.
///
/// Each color left as `None` falls back to the dark or light [`Palette`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Theme {
    /// Pick the dark palette for unset colors.
    pub dark: bool,
    /// Edge stroke.
    pub line_color: Option<Color>,
    /// Box fill.
    pub block_color: Option<Color>,
    /// Box outline.
    pub border_color: Option<Color>,
}

/// Fully resolved colors.
#[derive(Copy, Clone, Debug)]
pub struct Palette {
    /// Edge stroke.
    pub line: Color,
    /// Box fill.
    pub block: Color,
    /// Box outline.
    pub border: Color,
}

impl Palette {
    /// Defaults for dark backgrounds.
    pub fn dark() -> Self {
        Self {
            line: Color::from_rgb8(0xee, 0xee, 0xee),
            block: Color::from_rgb8(0x4a, 0x4b, 0xd2),
            border: Color::from_rgb8(0xee, 0xee, 0xee),
        }
    }

    /// Defaults for light backgrounds.
    pub fn light() -> Self {
        Self {
            line: Color::from_rgb8(0xa8, 0xbb, 0xf0),
            block: Color::from_rgb8(0x5d, 0x72, 0xb1),
            border: Color::from_rgb8(0x5d, 0x72, 0xb1),
        }
    }

    /// Style for node boxes.
    pub fn box_style(&self) -> BoxStyle {
        BoxStyle {
            fill: self.block,
            stroke: self.border,
        }
    }

    /// Style for edges.
    pub fn line_style(&self) -> LineStyle {
        LineStyle { stroke: self.line }
    }
}

impl Theme {
    /// The dark theme with no overrides.
    pub fn dark() -> Self {
        Self {
            dark: true,
            ..Self::default()
        }
    }

    /// Apply the overrides on top of the matching palette.
    pub fn resolve(&self) -> Palette {
        let base = if self.dark {
            Palette::dark()
        } else {
            Palette::light()
        };
        Palette {
            line: self.line_color.unwrap_or(base.line),
            block: self.block_color.unwrap_or(base.block),
            border: self.border_color.unwrap_or(base.border),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_is_the_default() {
        let p = Theme::default().resolve();
        assert_eq!(p.block.to_rgba8().to_u8_array(), [0x5d, 0x72, 0xb1, 0xff]);
        assert_eq!(p.line.to_rgba8().to_u8_array(), [0xa8, 0xbb, 0xf0, 0xff]);
        assert_eq!(p.border.to_rgba8().to_u8_array(), [0x5d, 0x72, 0xb1, 0xff]);
    }

    #[test]
    fn dark_palette() {
        let p = Theme::dark().resolve();
        assert_eq!(p.block.to_rgba8().to_u8_array(), [0x4a, 0x4b, 0xd2, 0xff]);
        assert_eq!(p.line.to_rgba8().to_u8_array(), [0xee, 0xee, 0xee, 0xff]);
    }

    #[test]
    fn overrides_win_per_color() {
        let theme = Theme {
            dark: true,
            block_color: Some(Color::from_rgb8(1, 2, 3)),
            ..Theme::default()
        };
        let p = theme.resolve();
        assert_eq!(p.block.to_rgba8().to_u8_array(), [1, 2, 3, 0xff]);
        assert_eq!(p.border.to_rgba8().to_u8_array(), [0xee, 0xee, 0xee, 0xff]);
        let style = p.box_style();
        assert_eq!(style.fill.to_rgba8(), p.block.to_rgba8());
        assert_eq!(p.line_style().stroke.to_rgba8(), p.line.to_rgba8());
    }
}

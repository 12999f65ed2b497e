// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{Affine, Rect};

use crate::style::{FontSpec, Graphic};

/// A glyph with its final position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph identifier in the font.
    pub id: u32,
    /// Horizontal position of the origin.
    pub x: f32,
    /// Vertical position of the origin (the baseline).
    pub y: f32,
}

/// Receives the drawing operations of a [`Layout`](crate::Layout).
///
/// Implement this to render into a scene, a display list or a raster surface.
pub trait Painter {
    /// Draws `glyphs` of `font`, each transformed by `transform` around its own origin.
    fn draw_glyphs(
        &mut self,
        font: &FontSpec,
        glyphs: &[PositionedGlyph],
        transform: Option<Affine>,
    );

    /// Draws one copy of `graphic` with its origin at `(x, y)`.
    fn draw_graphic(&mut self, graphic: &Graphic, x: f32, y: f32);

    /// Fills a decoration rectangle.
    fn fill_rect(&mut self, rect: Rect);
}

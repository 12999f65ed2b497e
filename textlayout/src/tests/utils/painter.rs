// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{Affine, Rect};

use crate::{FontSpec, Graphic, Painter, PositionedGlyph};

/// Records what a line draws.
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub(crate) glyphs: Vec<PositionedGlyph>,
    pub(crate) graphics: Vec<(u64, f32, f32)>,
    pub(crate) rects: Vec<Rect>,
}

impl Painter for RecordingPainter {
    fn draw_glyphs(
        &mut self,
        _font: &FontSpec,
        glyphs: &[PositionedGlyph],
        _transform: Option<Affine>,
    ) {
        self.glyphs.extend_from_slice(glyphs);
    }

    fn draw_graphic(&mut self, graphic: &Graphic, x: f32, y: f32) {
        self.graphics.push((graphic.id, x, y));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.rects.push(rect);
    }
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;
use peniko::kurbo::{BezPath, Rect};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};

use super::{Cluster, GlyphRun, RunMetrics, Shaper};
use crate::error::Error;
use crate::style::FontSpec;

#[derive(Clone, Debug)]
struct FontData {
    data: Arc<[u8]>,
    index: u32,
}

impl FontData {
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index).ok()
    }
}

/// A [`Shaper`] that reads metrics and outlines from font files with `skrifa`.
///
/// Each character maps to one glyph through the font's character map; there is no
/// substitution or positioning. Fonts are registered by family name. The first registered font
/// stands in for unknown families, and without any font, generic metrics proportional to the
/// font size are used.
#[derive(Clone, Debug, Default)]
pub struct SkrifaShaper {
    fonts: HashMap<Arc<str>, FontData>,
    fallback: Option<Arc<str>>,
}

impl SkrifaShaper {
    /// Creates a shaper with no fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the font at `index` in `data` (a font file or collection) under `family`.
    ///
    /// Fails when `data` does not hold a readable font at `index`.
    pub fn add_font(
        &mut self,
        family: impl Into<Arc<str>>,
        data: impl Into<Arc<[u8]>>,
        index: u32,
    ) -> Result<(), Error> {
        let font = FontData {
            data: data.into(),
            index,
        };
        if font.font_ref().is_none() {
            return Err(Error::invalid_argument("add_font"));
        }
        let family = family.into();
        self.fallback.get_or_insert_with(|| family.clone());
        self.fonts.insert(family, font);
        Ok(())
    }

    /// Number of registered fonts.
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn font_for(&self, font: &FontSpec) -> Option<FontRef<'_>> {
        self.fonts
            .get(&font.family)
            .or_else(|| self.fallback.as_ref().and_then(|f| self.fonts.get(f)))
            .and_then(FontData::font_ref)
    }
}

impl Shaper for SkrifaShaper {
    fn metrics(&self, font: &FontSpec, _text: &[char]) -> RunMetrics {
        let mut metrics = RunMetrics::from_size(font.size);
        metrics.ss_offset = font.superscript_offset();
        metrics.italic_angle = font.style.slant();
        let Some(font_ref) = self.font_for(font) else {
            return metrics;
        };
        let m = font_ref.metrics(Size::new(font.size), LocationRef::default());
        metrics.ascent = m.ascent;
        metrics.descent = -m.descent;
        metrics.leading = m.leading;
        if let Some(underline) = m.underline {
            metrics.underline_offset = -underline.offset;
            metrics.underline_size = underline.thickness;
        }
        if let Some(strikeout) = m.strikeout {
            metrics.strikethrough_offset = -strikeout.offset;
            metrics.strikethrough_size = strikeout.thickness;
        }
        if m.italic_angle != 0.0 {
            metrics.italic_angle = -m.italic_angle.to_radians().tan();
        }
        metrics
    }

    fn shape(
        &self,
        font: &FontSpec,
        text: &[char],
        range: Range<usize>,
        level: u8,
    ) -> Vec<GlyphRun> {
        let metrics = self.metrics(font, text);
        let chars = &text[range];
        let clusters = match self.font_for(font) {
            Some(font_ref) => {
                let charmap = font_ref.charmap();
                let glyph_metrics =
                    font_ref.glyph_metrics(Size::new(font.size), LocationRef::default());
                chars
                    .iter()
                    .map(|&ch| {
                        let id = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                        let advance = glyph_metrics.advance_width(id).unwrap_or_default();
                        let bounds = glyph_metrics.bounds(id).map_or(Rect::ZERO, |b| {
                            Rect::new(
                                f64::from(b.x_min),
                                f64::from(-b.y_max),
                                f64::from(b.x_max),
                                f64::from(-b.y_min),
                            )
                        });
                        Cluster::with_bounds(ch, id.to_u32(), advance, bounds)
                    })
                    .collect()
            }
            None => chars
                .iter()
                .map(|&ch| Cluster::simple(ch, ch as u32, font.size * 0.5))
                .collect(),
        };
        alloc::vec![GlyphRun::from_clusters(font.clone(), metrics, level, clusters)]
    }

    fn glyph_outline(&self, font: &FontSpec, glyph_id: u32) -> Option<BezPath> {
        let font_ref = self.font_for(font)?;
        let glyph = font_ref.outline_glyphs().get(GlyphId::new(glyph_id))?;
        let mut pen = BezPathPen(BezPath::new());
        let settings = DrawSettings::unhinted(Size::new(font.size), LocationRef::default());
        glyph.draw(settings, &mut pen).ok()?;
        Some(pen.0)
    }
}

/// Collects an outline with y pointing down.
struct BezPathPen(BezPath);

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((f64::from(x), f64::from(-y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((f64::from(x), f64::from(-y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to(
            (f64::from(cx0), f64::from(-cy0)),
            (f64::from(x), f64::from(-y)),
        );
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(
            (f64::from(cx0), f64::from(-cy0)),
            (f64::from(cx1), f64::from(-cy1)),
            (f64::from(x), f64::from(-y)),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use peniko::kurbo::{Affine, BezPath, Rect, Shape, Vec2};
use smallvec::SmallVec;

use crate::justify::JustificationInfo;
use crate::render::{Painter, PositionedGlyph};
use crate::shape::{RunMetrics, Shaper};
use crate::style::{Decoration, FontSpec, Graphic};

/// A positioned glyph within a [`Cluster`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Glyph identifier in the font.
    pub id: u32,
    /// Horizontal offset from the left edge of the cluster.
    pub x: f32,
    /// Vertical offset from the baseline, positive downward.
    pub y: f32,
    /// Ink bounds relative to the glyph origin.
    pub bounds: Rect,
}

/// The glyphs drawn for one character.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// The character.
    pub ch: char,
    /// Advance of the character.
    pub advance: f32,
    /// Glyphs in visual order, empty when the character is drawn as part of a neighbor.
    pub glyphs: SmallVec<[Glyph; 1]>,
}

impl Cluster {
    /// A character drawn with a single glyph at its origin, with empty ink bounds.
    pub fn simple(ch: char, id: u32, advance: f32) -> Self {
        Self::with_bounds(ch, id, advance, Rect::ZERO)
    }

    /// A character drawn with a single glyph at its origin.
    pub fn with_bounds(ch: char, id: u32, advance: f32, bounds: Rect) -> Self {
        let mut glyphs = SmallVec::new();
        glyphs.push(Glyph {
            id,
            x: 0.0,
            y: 0.0,
            bounds,
        });
        Self {
            ch,
            advance,
            glyphs,
        }
    }
}

/// What a [`GlyphRun`] draws.
#[derive(Clone, Debug, PartialEq)]
pub enum RunContent {
    /// Glyphs of a font.
    Glyphs(FontSpec),
    /// One copy of a graphic per character, placed at each cluster's single glyph.
    Graphic(Graphic),
}

/// A contiguous logical range of characters drawn with one font or graphic, on one baseline, at
/// one bidi level.
///
/// Positions are relative to the run's origin: the left edge of its first visual character on
/// the baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    content: RunContent,
    /// One cluster per character, in logical order.
    clusters: Vec<Cluster>,
    metrics: RunMetrics,
    level: u8,
    decoration: Decoration,
    /// Left edge of each character, indexed logically.
    char_x: Vec<f32>,
    advance: f32,
}

impl GlyphRun {
    /// Creates a run of font glyphs from clusters in logical order.
    pub fn from_clusters(
        font: FontSpec,
        metrics: RunMetrics,
        level: u8,
        clusters: Vec<Cluster>,
    ) -> Self {
        Self::new(RunContent::Glyphs(font), clusters, metrics, level)
    }

    /// Creates a run drawing `graphic` once for each of `chars`.
    pub fn from_graphic(graphic: Graphic, level: u8, chars: &[char]) -> Self {
        let metrics = graphic.metrics();
        let clusters = chars
            .iter()
            .map(|&ch| Cluster::with_bounds(ch, 0, graphic.advance, graphic.bounds()))
            .collect();
        Self::new(RunContent::Graphic(graphic), clusters, metrics, level)
    }

    fn new(content: RunContent, clusters: Vec<Cluster>, metrics: RunMetrics, level: u8) -> Self {
        let mut run = Self {
            content,
            clusters,
            metrics,
            level,
            decoration: Decoration::NONE,
            char_x: Vec::new(),
            advance: 0.0,
        };
        run.place_chars();
        run
    }

    /// Recomputes character positions by walking characters in visual order.
    fn place_chars(&mut self) {
        let count = self.clusters.len();
        let mut char_x = alloc::vec![0.0; count];
        let mut x = 0.0;
        for visual in 0..count {
            let logical = self.visual_to_logical(visual);
            char_x[logical] = x;
            x += self.clusters[logical].advance;
        }
        self.char_x = char_x;
        self.advance = x;
    }

    /// Returns the run with `decoration`.
    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = decoration;
        self
    }

    /// What the run draws.
    pub fn content(&self) -> &RunContent {
        &self.content
    }

    /// Clusters in logical order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// The font, for glyph runs.
    pub fn font(&self) -> Option<&FontSpec> {
        match &self.content {
            RunContent::Glyphs(font) => Some(font),
            RunContent::Graphic(_) => None,
        }
    }

    /// Vertical metrics.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Bidi level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Returns `true` for even levels.
    pub fn is_left_to_right(&self) -> bool {
        self.level & 1 == 0
    }

    /// Decorations drawn with the run.
    pub fn decoration(&self) -> Decoration {
        self.decoration
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.clusters.len()
    }

    /// Total advance.
    pub fn advance(&self) -> f32 {
        self.advance
    }

    /// The character at logical `index`.
    pub fn char_at(&self, index: usize) -> char {
        self.clusters[index].ch
    }

    /// Size used for default justification records.
    fn size(&self) -> f32 {
        match &self.content {
            RunContent::Glyphs(font) => font.size,
            RunContent::Graphic(graphic) => graphic.advance,
        }
    }

    /// Logical index of the character at visual position `index` within the run.
    pub fn visual_to_logical(&self, index: usize) -> usize {
        if self.is_left_to_right() {
            index
        } else {
            self.clusters.len() - 1 - index
        }
    }

    /// Advance of the character at logical `index`.
    pub fn char_advance(&self, index: usize) -> f32 {
        self.clusters[index].advance
    }

    /// Left edge of the character at logical `index`.
    pub fn char_x(&self, index: usize) -> f32 {
        self.char_x[index]
    }

    /// Vertical offset of the character at logical `index` from the run's baseline.
    pub fn char_y(&self, index: usize) -> f32 {
        self.clusters[index].glyphs.first().map_or(0.0, |g| g.y) + self.metrics.ss_offset
    }

    /// Returns `true` if a caret may be placed before the character at logical `index`.
    ///
    /// Carets never separate a zero-advance character from the one it attaches to, except at
    /// the run edges and before tabs and line terminators.
    pub fn caret_at_offset_is_valid(&self, index: usize) -> bool {
        if index == 0 || index == self.clusters.len() {
            return true;
        }
        if matches!(self.clusters[index].ch, '\t' | '\n' | '\r') {
            return true;
        }
        self.clusters[index].advance != 0.0
    }

    fn transform(&self) -> Option<Affine> {
        self.font().and_then(|f| f.transform)
    }

    /// Ink bounds of the character at logical `index`, relative to the run origin.
    pub fn char_visual_bounds(&self, index: usize) -> Option<Rect> {
        let x = f64::from(self.char_x[index]);
        let ss = f64::from(self.metrics.ss_offset);
        let bounds = self.clusters[index]
            .glyphs
            .iter()
            .filter(|g| g.bounds.area() != 0.0)
            .map(|g| g.bounds + Vec2::new(x + f64::from(g.x), f64::from(g.y) + ss))
            .reduce(|a, b| a.union(b))?;
        Some(match self.transform() {
            Some(t) => t.transform_rect_bbox(bounds),
            None => bounds,
        })
    }

    /// Union of the ink bounds of all characters, `None` when nothing is inked.
    pub fn visual_bounds(&self) -> Option<Rect> {
        (0..self.clusters.len())
            .filter_map(|i| self.char_visual_bounds(i))
            .reduce(|a, b| a.union(b))
    }

    /// Advance by ascent, descent and leading.
    pub fn logical_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            -f64::from(self.metrics.ascent),
            f64::from(self.advance),
            f64::from(self.metrics.descent + self.metrics.leading),
        )
    }

    /// Logical box sheared by the italic angle so slanted glyphs stay inside it.
    pub fn italic_bounds(&self) -> Rect {
        let angle = self.metrics.italic_angle;
        let ss = self.metrics.ss_offset;
        let top = -self.metrics.ascent;
        let bottom = self.metrics.descent;
        let mut left = 0.0;
        let mut right = self.advance;
        if angle > 0.0 {
            left -= angle * (bottom - ss);
            right -= angle * (top - ss);
        } else if angle < 0.0 {
            left -= angle * (top - ss);
            right -= angle * (bottom - ss);
        }
        Rect::new(
            f64::from(left),
            f64::from(top),
            f64::from(right),
            f64::from(bottom),
        )
    }

    /// Index of the first character, at or after `start`, that does not fit when the
    /// characters from `start` on are laid out in `width`.
    pub fn line_break_index(&self, start: usize, mut width: f32) -> usize {
        let mut index = start;
        while index < self.clusters.len() {
            width -= self.clusters[index].advance;
            if width < 0.0 {
                break;
            }
            index += 1;
        }
        index
    }

    /// Sum of the advances of characters `start..limit`.
    pub fn advance_between(&self, start: usize, limit: usize) -> f32 {
        self.clusters[start..limit].iter().map(|c| c.advance).sum()
    }

    /// Copy of the characters `start..limit`, at `level` when given.
    pub fn subset(&self, start: usize, limit: usize, level: Option<u8>) -> Self {
        let mut run = Self::new(
            self.content.clone(),
            self.clusters[start..limit].to_vec(),
            self.metrics,
            level.unwrap_or(self.level),
        );
        run.decoration = self.decoration;
        run
    }

    /// Default justification records of characters `start..limit` in visual order, `None`
    /// outside that range.
    pub fn justification_infos(
        &self,
        start: usize,
        limit: usize,
    ) -> Vec<Option<JustificationInfo>> {
        let size = self.size();
        (0..self.clusters.len())
            .map(|visual| {
                let logical = self.visual_to_logical(visual);
                if logical < start || logical >= limit {
                    return None;
                }
                let cluster = &self.clusters[logical];
                Some(match &self.content {
                    RunContent::Graphic(graphic) => graphic.justification_info(),
                    RunContent::Glyphs(_) => {
                        JustificationInfo::for_char(cluster.ch, cluster.advance, size)
                    }
                })
            })
            .collect()
    }

    /// Applies two deltas per character in visual order.
    ///
    /// Whitespace takes both deltas as extra advance. Other characters move their glyphs by the
    /// left delta and take both as extra advance. Returns the new run and whether a character
    /// could not take its full shrinkage, which calls for another justification pass.
    pub fn apply_justification(&self, deltas: &[f32]) -> (Self, bool) {
        let mut clusters = self.clusters.clone();
        let mut rejustify = false;
        for visual in 0..clusters.len() {
            let (left, right) = (deltas[visual * 2], deltas[visual * 2 + 1]);
            if left == 0.0 && right == 0.0 {
                continue;
            }
            let cluster = &mut clusters[self.visual_to_logical(visual)];
            let mut advance = cluster.advance + left + right;
            if advance < 0.0 {
                advance = 0.0;
                rejustify = true;
            }
            cluster.advance = advance;
            if !cluster.ch.is_whitespace() {
                for glyph in &mut cluster.glyphs {
                    glyph.x += left;
                }
            }
        }
        let mut run = Self::new(self.content.clone(), clusters, self.metrics, self.level);
        run.decoration = self.decoration;
        (run, rejustify)
    }

    /// Glyphs of the run positioned relative to `(x, y)`, in visual order.
    pub fn positioned_glyphs(&self, x: f32, y: f32) -> Vec<PositionedGlyph> {
        let mut glyphs = Vec::with_capacity(self.clusters.len());
        for visual in 0..self.clusters.len() {
            let logical = self.visual_to_logical(visual);
            let cx = x + self.char_x[logical];
            for glyph in &self.clusters[logical].glyphs {
                glyphs.push(PositionedGlyph {
                    id: glyph.id,
                    x: cx + glyph.x,
                    y: y + glyph.y + self.metrics.ss_offset,
                });
            }
        }
        glyphs
    }

    /// Rectangles of the underline and strikethrough at `(x, y)`.
    pub fn decoration_rects(&self, x: f32, y: f32) -> SmallVec<[Rect; 2]> {
        let mut rects = SmallVec::new();
        let rect = |offset: f32, size: f32| {
            let top = y + offset;
            Rect::new(
                f64::from(x),
                f64::from(top),
                f64::from(x + self.advance),
                f64::from(top + size.max(1.0)),
            )
        };
        if self.decoration.underline {
            rects.push(rect(
                self.metrics.underline_offset,
                self.metrics.underline_size,
            ));
        }
        if self.decoration.strikethrough {
            rects.push(rect(
                self.metrics.strikethrough_offset,
                self.metrics.strikethrough_size,
            ));
        }
        rects
    }

    /// Outline of the run drawn at `(x, y)`.
    pub fn outline(&self, shaper: &dyn Shaper, x: f32, y: f32) -> BezPath {
        let mut path = BezPath::new();
        let origin = Affine::translate((f64::from(x), f64::from(y)));
        match &self.content {
            RunContent::Glyphs(font) => {
                let run_transform = font.transform.unwrap_or(Affine::IDENTITY);
                for glyph in self.positioned_glyphs(0.0, 0.0) {
                    if let Some(outline) = shaper.glyph_outline(font, glyph.id) {
                        let at = Affine::translate((f64::from(glyph.x), f64::from(glyph.y)));
                        let placed = origin * run_transform * at * outline;
                        path.extend(placed.elements().iter().copied());
                    }
                }
            }
            RunContent::Graphic(_) => {
                for i in 0..self.clusters.len() {
                    if let Some(bounds) = self.char_visual_bounds(i) {
                        let placed = origin * bounds.to_path(0.1);
                        path.extend(placed.elements().iter().copied());
                    }
                }
            }
        }
        for rect in self.decoration_rects(x, y) {
            path.extend(rect.path_elements(0.1));
        }
        path
    }

    /// Draws the run with its origin at `(x, y)`.
    pub fn draw(&self, painter: &mut dyn Painter, x: f32, y: f32) {
        match &self.content {
            RunContent::Glyphs(font) => {
                let glyphs = self.positioned_glyphs(x, y);
                painter.draw_glyphs(font, &glyphs, font.transform);
            }
            RunContent::Graphic(graphic) => {
                for glyph in self.positioned_glyphs(x, y) {
                    painter.draw_graphic(graphic, glyph.x, glyph.y);
                }
            }
        }
        for rect in self.decoration_rects(x, y) {
            painter.fill_rect(rect);
        }
    }
}

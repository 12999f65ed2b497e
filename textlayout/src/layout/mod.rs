// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable laid-out lines and the queries editors make against them.

mod caret;
mod highlight;
mod hit;

use alloc::sync::Arc;
use alloc::vec::Vec;

use peniko::kurbo::{Affine, BezPath, Rect};

use crate::bidi::{BidiAnalyzer, BidiOrdering};
use crate::context::LayoutContext;
use crate::error::Error;
use crate::line::{Line, LineMetrics};
use crate::paragraph::ParagraphStyleIndex;
use crate::render::Painter;
use crate::segment::{RunSegmenter, StyleSource};
use crate::shape::{normalize_offsets, Baseline, RunBaseline, RunMetrics, Shaper};
use crate::style::RunDirection;
use crate::text::StyledText;

pub use caret::{CaretInfo, CaretPolicy, CaretShapes, DefaultCaretPolicy};
pub use hit::{HitTestOptions, TextHit};

/// Justification state of a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Justification {
    Ratio(f32),
    AlreadyJustified,
}

/// Paragraph-wide values derived once from a [`StyledText`].
#[derive(Clone, Debug)]
pub(crate) struct ParagraphInfo {
    /// Characters after numeric shaping.
    pub(crate) chars: Arc<[char]>,
    pub(crate) baseline: Baseline,
    /// Baseline offsets relative to `baseline`.
    pub(crate) baseline_offsets: [f32; 3],
    pub(crate) justification: f32,
    /// Levels of the whole paragraph.
    pub(crate) ordering: BidiOrdering,
}

impl ParagraphInfo {
    pub(crate) fn new(cx: &LayoutContext, text: &StyledText) -> Self {
        let chars = shaped_chars(text);
        let (baseline, baseline_offsets) = paragraph_baseline(cx.shaper(), text, &chars);
        let ordering = analyze_bidi(cx.bidi(), text, &chars);
        Self {
            chars,
            baseline,
            baseline_offsets,
            justification: text.paragraph_style().justification_ratio(),
            ordering,
        }
    }
}

/// Characters of `text` after the paragraph's numeric shaping.
pub(crate) fn shaped_chars(text: &StyledText) -> Arc<[char]> {
    match text.paragraph_style().numeric_shaper {
        Some(shaper) => {
            let mut chars = text.chars().to_vec();
            shaper.shape(&mut chars);
            chars.into()
        }
        None => text.shared_chars(),
    }
}

/// The paragraph's baseline and the offsets of all baselines relative to it.
pub(crate) fn paragraph_baseline(
    shaper: &dyn Shaper,
    text: &StyledText,
    chars: &[char],
) -> (Baseline, [f32; 3]) {
    let metrics = paragraph_metrics(shaper, text, chars);
    let baseline = match metrics.baseline {
        RunBaseline::Text(baseline) => baseline,
        RunBaseline::Top | RunBaseline::Bottom => Baseline::Roman,
    };
    (baseline, normalize_offsets(metrics.baseline_offsets, baseline))
}

/// Metrics of the first font of the paragraph, or of its first graphic when it has no font.
fn paragraph_metrics(shaper: &dyn Shaper, text: &StyledText, chars: &[char]) -> RunMetrics {
    if let Some((_, style)) = text.styles().find(|(_, style)| style.graphic.is_none()) {
        return shaper.metrics(&style.font(), chars);
    }
    let style = text.style_at(0);
    match &style.graphic {
        Some(graphic) => graphic.metrics(),
        None => RunMetrics::from_size(style.size),
    }
}

/// Runs the bidi analyzer when the paragraph needs it.
pub(crate) fn analyze_bidi(
    analyzer: &dyn BidiAnalyzer,
    text: &StyledText,
    chars: &[char],
) -> BidiOrdering {
    let direction = text.paragraph_style().run_direction;
    let embeddings = text
        .styles()
        .any(|(_, style)| style.embedding().is_some())
        .then(|| {
            let mut embeddings: Vec<i8> = alloc::vec![0; chars.len()];
            for (range, style) in text.styles() {
                if let Some(level) = style.embedding() {
                    embeddings[range].fill(level);
                }
            }
            embeddings
        });
    let requires_bidi = direction == Some(RunDirection::Rtl)
        || embeddings.is_some()
        || analyzer.requires_bidi(chars);
    if !requires_bidi {
        return BidiOrdering::left_to_right(chars.len());
    }
    tracing::trace!(len = chars.len(), ?direction, "running bidi analysis");
    BidiOrdering::analyze(analyzer, chars, embeddings.as_deref(), direction)
}

/// A fully laid-out line of text.
///
/// A layout is immutable. It answers hit testing, caret and highlight queries, and produces a
/// justified copy of itself at most once.
///
/// Character indices are relative to the first character of the line. Hits may refer to the
/// positions just outside the line, `-1` and [`character_count`](Self::character_count).
#[derive(Clone, Debug)]
pub struct Layout {
    line: Arc<Line>,
    shaper: Arc<dyn Shaper>,
    baseline: Baseline,
    baseline_offsets: [f32; 3],
    justification: Justification,
    visible_advance: f32,
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line
            && self.baseline == other.baseline
            && self.baseline_offsets == other.baseline_offsets
            && self.justification == other.justification
    }
}

impl Layout {
    /// Lays out the whole of `text` on one line.
    pub fn new(cx: &LayoutContext, text: &StyledText) -> Result<Self, Error> {
        if text.is_empty() {
            return Err(Error::invalid_argument("Layout::new"));
        }
        let info = ParagraphInfo::new(cx, text);
        let len = info.chars.len();
        let ordering = info.ordering.line(&info.chars, 0..len);
        let style = text.style_at(0);
        let runs = if text.has_single_style() && style.graphic.is_none() {
            let font = style.font_or_graphic();
            let source = StyleSource::Single {
                font_or_graphic: &font,
                decoration: style.decoration,
            };
            RunSegmenter::new(cx.shaper(), &info.chars, &ordering, source).segment(0..len)?
        } else {
            let styles = ParagraphStyleIndex::new(text);
            let source = StyleSource::Paragraph(&styles);
            RunSegmenter::new(cx.shaper(), &info.chars, &ordering, source).segment(0..len)?
        };
        let line = Line::new(runs, info.baseline_offsets, info.chars, 0..len, ordering);
        Self::from_line(
            cx.shared_shaper(),
            line,
            info.baseline,
            info.baseline_offsets,
            info.justification,
        )
    }

    pub(crate) fn from_line(
        shaper: Arc<dyn Shaper>,
        line: Line,
        baseline: Baseline,
        baseline_offsets: [f32; 3],
        justification: f32,
    ) -> Result<Self, Error> {
        Self::with_justification(
            shaper,
            line,
            baseline,
            baseline_offsets,
            Justification::Ratio(justification),
        )
    }

    fn with_justification(
        shaper: Arc<dyn Shaper>,
        line: Line,
        baseline: Baseline,
        baseline_offsets: [f32; 3],
        justification: Justification,
    ) -> Result<Self, Error> {
        let visible_advance = visible_advance(&line)?;
        Ok(Self {
            line: Arc::new(line),
            shaper,
            baseline,
            baseline_offsets,
            justification,
            visible_advance,
        })
    }

    /// The underlying line.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Line metrics.
    pub fn metrics(&self) -> &LineMetrics {
        self.line.metrics()
    }

    /// Distance from the origin to the end of the line.
    pub fn advance(&self) -> f32 {
        self.line.metrics().advance
    }

    /// Advance without trailing whitespace, measured from the side the line starts on.
    pub fn visible_advance(&self) -> f32 {
        self.visible_advance
    }

    /// Ascent of the line.
    pub fn ascent(&self) -> f32 {
        self.line.metrics().ascent
    }

    /// Descent of the line.
    pub fn descent(&self) -> f32 {
        self.line.metrics().descent
    }

    /// Leading of the line.
    pub fn leading(&self) -> f32 {
        self.line.metrics().leading
    }

    /// Ink bounds of the line.
    pub fn bounds(&self) -> Rect {
        self.line.visual_bounds()
    }

    /// Logical bounds widened for slanted runs; the default bounds for carets and highlights.
    pub fn natural_bounds(&self) -> Rect {
        self.line.italic_bounds()
    }

    /// Returns `true` when the base direction is left-to-right.
    pub fn is_left_to_right(&self) -> bool {
        self.line.is_direction_left_to_right()
    }

    /// Number of characters on the line.
    pub fn character_count(&self) -> usize {
        self.line.char_count()
    }

    /// The baseline the line is aligned on.
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// Offsets of the roman, center and hanging baselines relative to [`baseline`](Self::baseline).
    pub fn baseline_offsets(&self) -> [f32; 3] {
        self.baseline_offsets
    }

    /// Returns `true` for a layout produced by [`justified_layout`](Self::justified_layout).
    pub fn is_justified(&self) -> bool {
        self.justification == Justification::AlreadyJustified
    }

    /// Bidi level of the character at `index`.
    ///
    /// The positions just outside the line, `-1` and the character count, have the base level.
    pub fn character_level(&self, index: isize) -> Result<u8, Error> {
        let count = self.character_count();
        if index < -1 || index > count as isize {
            return Err(Error::index_out_of_range("character_level", index, count));
        }
        Ok(self.level_at(index))
    }

    pub(crate) fn level_at(&self, index: isize) -> u8 {
        match usize::try_from(index) {
            Ok(i) if i < self.character_count() => self.line.ordering().level(i),
            _ => u8::from(!self.is_left_to_right()),
        }
    }

    /// Returns a copy stretched or compressed to `width`.
    ///
    /// Trailing whitespace is left out of the justified range. When the paragraph's
    /// justification ratio is 0, or the line already has the requested width, the result is
    /// equal to `self`. A layout returned after justification cannot be justified again.
    pub fn justified_layout(&self, width: f32) -> Result<Self, Error> {
        if width.is_nan() || width <= 0.0 {
            return Err(Error::invalid_argument("justified_layout"));
        }
        let Justification::Ratio(ratio) = self.justification else {
            return Err(Error::already_justified());
        };
        let mut limit = self.character_count();
        while limit > 0 && self.line.is_char_whitespace(limit - 1)? {
            limit -= 1;
        }
        match self.line.justified_line(width, ratio, 0, limit)? {
            Some(line) => Self::with_justification(
                self.shaper.clone(),
                line,
                self.baseline,
                self.baseline_offsets,
                Justification::AlreadyJustified,
            ),
            None => Ok(self.clone()),
        }
    }

    /// Outline of the line with its origin at `(0, 0)`.
    pub fn outline(&self, transform: Option<Affine>) -> BezPath {
        self.line.outline(&*self.shaper, transform)
    }

    /// Draws the line with its origin at `(x, y)`.
    pub fn draw(&self, painter: &mut dyn Painter, x: f32, y: f32) {
        self.line.draw(painter, x, y);
    }
}

fn visible_advance(line: &Line) -> Result<f32, Error> {
    let count = line.char_count();
    let advance = line.metrics().advance;
    if line.is_direction_left_to_right() {
        let mut last = count;
        while last > 0 && line.is_char_space(line.visual_to_logical(last - 1))? {
            last -= 1;
        }
        if last == count {
            Ok(advance)
        } else if last == 0 {
            Ok(0.0)
        } else {
            let index = line.visual_to_logical(last - 1);
            Ok(line.char_x(index)? + line.char_advance(index)?)
        }
    } else {
        let mut first = 0;
        while first < count && line.is_char_space(line.visual_to_logical(first))? {
            first += 1;
        }
        if first == count {
            Ok(0.0)
        } else if first == 0 {
            Ok(advance)
        } else {
            Ok(advance - line.char_x(line.visual_to_logical(first))?)
        }
    }
}

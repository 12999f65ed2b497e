// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single visually laid-out line.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use peniko::kurbo::{Affine, BezPath, Rect, Vec2};

use crate::bidi::{contiguous_order, inverse_map, BidiOrdering};
use crate::error::Error;
use crate::justify::{JustificationInfo, Justifier};
use crate::render::Painter;
use crate::shape::{GlyphRun, RunMetrics, Shaper};

/// Metrics of a line.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the tallest run.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the deepest run.
    pub descent: f32,
    /// Additional space below the descent before the next line.
    pub leading: f32,
    /// Position after the last run, including italic padding.
    pub advance: f32,
}

impl LineMetrics {
    /// Ascent plus descent plus leading.
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Glyph runs placed along a baseline.
///
/// Runs are kept in logical order. The line computes their visual order, the origin of each
/// run and the line-wide metrics once, at construction; a justified line is a new value.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    runs: Vec<GlyphRun>,
    /// Visual position to logical run index, `None` for the identity.
    run_order: Option<Vec<usize>>,
    /// Origin of each run, indexed logically.
    origins: Vec<(f32, f32)>,
    /// Roman, center and hanging offsets, then bottom and top of the line.
    baseline_offsets: [f32; 5],
    text: Arc<[char]>,
    range: Range<usize>,
    ordering: BidiOrdering,
    metrics: LineMetrics,
}

impl Line {
    /// Places `runs`, which cover `text[range]` in logical order.
    ///
    /// `ordering` holds the levels of the characters of the line (not of the paragraph).
    pub fn new(
        runs: Vec<GlyphRun>,
        baseline_offsets: [f32; 3],
        text: Arc<[char]>,
        range: Range<usize>,
        ordering: BidiOrdering,
    ) -> Self {
        let run_order = Self::compute_run_order(&runs, &ordering);
        let mut line = Self {
            runs,
            run_order,
            origins: Vec::new(),
            baseline_offsets: [
                baseline_offsets[0],
                baseline_offsets[1],
                baseline_offsets[2],
                0.0,
                0.0,
            ],
            text,
            range,
            ordering,
            metrics: LineMetrics::default(),
        };
        line.compute_metrics();
        line.place_runs();
        line
    }

    /// Ranks runs by the visual position of their first character.
    fn compute_run_order(runs: &[GlyphRun], ordering: &BidiOrdering) -> Option<Vec<usize>> {
        if ordering.is_left_to_right() || runs.len() < 2 {
            return None;
        }
        let mut ranks = Vec::with_capacity(runs.len());
        let mut start = 0;
        for run in runs {
            ranks.push(ordering.logical_to_visual(start));
            start += run.char_count();
        }
        let logical_to_visual = contiguous_order(&ranks);
        Some(inverse_map(&logical_to_visual))
    }

    fn compute_metrics(&mut self) {
        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;
        let mut leading = 0.0_f32;
        let mut edge_height = 0.0_f32;
        let mut edge_height_with_leading = 0.0_f32;
        let mut has_edge_runs = false;
        for run in &self.runs {
            let m = run.metrics();
            if m.is_edge_aligned() {
                has_edge_runs = true;
                edge_height = edge_height.max(m.height());
                edge_height_with_leading = edge_height_with_leading.max(m.height() + m.leading);
            } else {
                let offset = m.effective_baseline_offset(&self.baseline_offsets);
                ascent = ascent.max(m.ascent - offset);
                let run_descent = offset + m.descent;
                descent = descent.max(run_descent);
                leading = leading.max(run_descent + m.leading);
            }
        }
        if has_edge_runs {
            if edge_height > ascent + descent {
                descent = edge_height - ascent;
            }
            if edge_height_with_leading > ascent + leading {
                leading = edge_height_with_leading - ascent;
            }
        }
        leading -= descent;
        self.baseline_offsets[3] = descent;
        self.baseline_offsets[4] = -ascent;
        self.metrics = LineMetrics {
            ascent,
            descent,
            leading,
            advance: 0.0,
        };
    }

    /// Walks runs in visual order, nudging each run right when a change of slant or baseline
    /// would make it overlap its predecessor.
    fn place_runs(&mut self) {
        let mut origins = alloc::vec![(0.0, 0.0); self.runs.len()];
        let mut x = 0.0_f32;
        let mut previous: Option<&RunMetrics> = None;
        for visual in 0..self.runs.len() {
            let logical = self.run_logical_index(visual);
            let run = &self.runs[logical];
            let m = run.metrics();
            let y = m.effective_baseline_offset(&self.baseline_offsets);
            if let Some(p) = previous {
                let slanted = p.italic_angle != 0.0 || m.italic_angle != 0.0;
                let differs = p.italic_angle != m.italic_angle
                    || p.baseline != m.baseline
                    || p.ss_offset != m.ss_offset;
                if slanted && differs {
                    let pb = p.effective_baseline_offset(&self.baseline_offsets);
                    let top = (pb - p.ascent).max(y - m.ascent);
                    let bottom = (pb + p.descent).min(y + m.descent);
                    let at_top = p.italic_angle * (pb - top) - m.italic_angle * (y - top);
                    let at_bottom = p.italic_angle * (pb - bottom) - m.italic_angle * (y - bottom);
                    x += at_top.max(at_bottom);
                }
            }
            origins[logical] = (x, y);
            x += run.advance();
            previous = Some(m);
        }
        if let Some(p) = previous.filter(|p| p.italic_angle != 0.0) {
            let pb = p.effective_baseline_offset(&self.baseline_offsets) + p.ss_offset;
            let overhang = if p.italic_angle > 0.0 {
                pb + p.ascent
            } else {
                pb - p.descent
            };
            x += overhang * p.italic_angle;
        }
        self.origins = origins;
        self.metrics.advance = x;
    }

    /// Line metrics.
    pub fn metrics(&self) -> &LineMetrics {
        &self.metrics
    }

    /// Runs in logical order.
    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    /// Origin of the run at logical `index`.
    pub fn run_origin(&self, index: usize) -> (f32, f32) {
        self.origins[index]
    }

    /// Logical index of the run at visual position `index`.
    pub fn run_logical_index(&self, index: usize) -> usize {
        self.run_order.as_ref().map_or(index, |order| order[index])
    }

    /// Extended baseline table: roman, center, hanging, bottom and top.
    pub fn baseline_offsets(&self) -> &[f32; 5] {
        &self.baseline_offsets
    }

    /// Returns `true` when the base direction is left-to-right.
    pub fn is_direction_left_to_right(&self) -> bool {
        self.ordering.is_base_left_to_right()
    }

    /// Character levels and orderings of the line.
    pub fn ordering(&self) -> &BidiOrdering {
        &self.ordering
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.range.len()
    }

    /// The characters of the line.
    pub fn chars(&self) -> &[char] {
        &self.text[self.range.clone()]
    }

    /// Run index and index within the run of the character at `index`.
    fn locate(&self, index: usize) -> Result<(usize, usize), Error> {
        let mut start = 0;
        for (i, run) in self.runs.iter().enumerate() {
            let count = run.char_count();
            if index < start + count {
                return Ok((i, index - start));
            }
            start += count;
        }
        Err(Error::index_out_of_range(
            "line character query",
            index as isize,
            self.char_count(),
        ))
    }

    /// Index of the run containing the character at `index`.
    pub fn char_run(&self, index: usize) -> Result<usize, Error> {
        self.locate(index).map(|(run, _)| run)
    }

    /// Metrics of the run containing the character at `index`.
    pub fn char_metrics(&self, index: usize) -> Result<&RunMetrics, Error> {
        let (run, _) = self.locate(index)?;
        Ok(self.runs[run].metrics())
    }

    /// Left edge of the character at `index`.
    pub fn char_x(&self, index: usize) -> Result<f32, Error> {
        let (run, local) = self.locate(index)?;
        Ok(self.origins[run].0 + self.runs[run].char_x(local))
    }

    /// Vertical offset of the character at `index` from the line's baseline.
    pub fn char_y(&self, index: usize) -> Result<f32, Error> {
        let (run, local) = self.locate(index)?;
        Ok(self.origins[run].1 + self.runs[run].char_y(local))
    }

    /// Advance of the character at `index`.
    pub fn char_advance(&self, index: usize) -> Result<f32, Error> {
        let (run, local) = self.locate(index)?;
        Ok(self.runs[run].char_advance(local))
    }

    /// Position of the leading or trailing edge of the character at `index`.
    pub fn char_line_position(&self, index: usize, leading: bool) -> Result<f32, Error> {
        let x = self.char_x(index)?;
        if self.is_char_ltr(index)? == leading {
            Ok(x)
        } else {
            Ok(x + self.char_advance(index)?)
        }
    }

    /// Ink bounds of the character at `index`, empty at its origin when nothing is inked.
    pub fn char_bounds(&self, index: usize) -> Result<Rect, Error> {
        let (run, local) = self.locate(index)?;
        let (x, y) = self.origins[run];
        Ok(match self.runs[run].char_visual_bounds(local) {
            Some(bounds) => bounds + Vec2::new(f64::from(x), f64::from(y)),
            None => {
                let x = f64::from(x + self.runs[run].char_x(local));
                Rect::new(x, f64::from(y), x, f64::from(y))
            }
        })
    }

    /// Bidi level of the character at `index`.
    pub fn char_level(&self, index: usize) -> Result<u8, Error> {
        self.check_index(index)?;
        Ok(self.ordering.level(index))
    }

    /// Returns `true` if the character at `index` is at an even level.
    pub fn is_char_ltr(&self, index: usize) -> Result<bool, Error> {
        Ok(self.char_level(index)? & 1 == 0)
    }

    /// Italic angle of the run containing the character at `index`.
    pub fn char_angle(&self, index: usize) -> Result<f32, Error> {
        Ok(self.char_metrics(index)?.italic_angle)
    }

    /// Superscript or subscript shift of the character at `index`.
    pub fn char_shift(&self, index: usize) -> Result<f32, Error> {
        Ok(self.char_metrics(index)?.ss_offset)
    }

    /// Ascent of the run containing the character at `index`.
    pub fn char_ascent(&self, index: usize) -> Result<f32, Error> {
        Ok(self.char_metrics(index)?.ascent)
    }

    /// Descent of the run containing the character at `index`.
    pub fn char_descent(&self, index: usize) -> Result<f32, Error> {
        Ok(self.char_metrics(index)?.descent)
    }

    /// Returns `true` for space separators.
    pub fn is_char_space(&self, index: usize) -> Result<bool, Error> {
        self.check_index(index)?;
        let ch = self.chars()[index];
        Ok(ch.is_whitespace() && !ch.is_control())
    }

    /// Returns `true` for any whitespace, including tabs and line terminators.
    pub fn is_char_whitespace(&self, index: usize) -> Result<bool, Error> {
        self.check_index(index)?;
        Ok(self.chars()[index].is_whitespace())
    }

    /// Returns `true` if a caret may be placed before the character at `index`.
    pub fn caret_at_offset_is_valid(&self, index: usize) -> Result<bool, Error> {
        if index == self.char_count() {
            return Ok(true);
        }
        let (run, local) = self.locate(index)?;
        Ok(self.runs[run].caret_at_offset_is_valid(local))
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.char_count() {
            Ok(())
        } else {
            Err(Error::index_out_of_range(
                "line character query",
                index as isize,
                self.char_count(),
            ))
        }
    }

    /// Logical index of the character at visual position `index`.
    pub fn visual_to_logical(&self, index: usize) -> usize {
        self.ordering.visual_to_logical(index)
    }

    /// Visual position of the character at logical `index`.
    pub fn logical_to_visual(&self, index: usize) -> usize {
        self.ordering.logical_to_visual(index)
    }

    /// Sum of the advances of characters `start..limit`.
    pub fn advance_between(&self, start: usize, limit: usize) -> f32 {
        advance_between(&self.runs, start, limit)
    }

    /// Union of the ink bounds of all runs.
    pub fn visual_bounds(&self) -> Rect {
        self.runs
            .iter()
            .zip(&self.origins)
            .filter_map(|(run, &(x, y))| {
                run.visual_bounds()
                    .map(|b| b + Vec2::new(f64::from(x), f64::from(y)))
            })
            .reduce(|a, b| a.union(b))
            .unwrap_or_default()
    }

    /// Union of the italic bounds of all runs.
    pub fn italic_bounds(&self) -> Rect {
        self.runs
            .iter()
            .zip(&self.origins)
            .map(|(run, &(x, y))| run.italic_bounds() + Vec2::new(f64::from(x), f64::from(y)))
            .reduce(|a, b| a.union(b))
            .unwrap_or_default()
    }

    /// Outline of the line with its origin at `(0, 0)`, transformed by `transform`.
    pub fn outline(&self, shaper: &dyn Shaper, transform: Option<Affine>) -> BezPath {
        let mut path = BezPath::new();
        for (run, &(x, y)) in self.runs.iter().zip(&self.origins) {
            path.extend(run.outline(shaper, x, y).elements().iter().copied());
        }
        match transform {
            Some(t) => t * path,
            None => path,
        }
    }

    /// Draws runs in visual order with the line origin at `(x, y)`.
    pub fn draw(&self, painter: &mut dyn Painter, x: f32, y: f32) {
        for visual in 0..self.runs.len() {
            let logical = self.run_logical_index(visual);
            let (rx, ry) = self.origins[logical];
            self.runs[logical].draw(painter, x + rx, y + ry);
        }
    }

    /// Returns a line stretched or compressed so that characters `start..limit` take
    /// `width`, scaled by `ratio`.
    ///
    /// Returns `None` when no change is needed.
    pub fn justified_line(
        &self,
        width: f32,
        ratio: f32,
        start: usize,
        limit: usize,
    ) -> Result<Option<Self>, Error> {
        if start > limit || limit > self.char_count() {
            return Err(Error::invalid_range(
                "justified_line",
                start as isize,
                limit as isize,
                self.char_count(),
            ));
        }
        if ratio == 0.0 {
            return Ok(None);
        }
        let mut runs = self.runs.clone();
        let mut passes = 0;
        loop {
            passes += 1;
            let delta = (width - advance_between(&runs, start, limit)) * ratio;
            if delta == 0.0 {
                if passes == 1 {
                    return Ok(None);
                }
                break;
            }

            // Slot of each run's first record, records laid out in visual run order.
            let mut slots = alloc::vec![0; runs.len()];
            let mut count = 0;
            for visual in 0..runs.len() {
                let logical = self.run_logical_index(visual);
                slots[logical] = count;
                count += runs[logical].char_count();
            }
            let mut infos: Vec<Option<JustificationInfo>> = alloc::vec![None; count];
            let mut run_start = 0;
            for (i, run) in runs.iter().enumerate() {
                let run_limit = run_start + run.char_count();
                if run_limit > start && run_start < limit {
                    let min = start.saturating_sub(run_start);
                    let max = run.char_count().min(limit - run_start);
                    let run_infos = run.justification_infos(min, max);
                    infos[slots[i]..slots[i] + run_infos.len()].copy_from_slice(&run_infos);
                }
                run_start = run_limit;
            }

            let first = infos.iter().position(Option::is_some).unwrap_or(count);
            let last = infos.iter().rposition(Option::is_some).map_or(first, |i| i + 1);
            let records: Vec<JustificationInfo> = infos[first..last]
                .iter()
                .map(|info| info.unwrap_or(JustificationInfo::NONE))
                .collect();
            let mut deltas = alloc::vec![0.0; count * 2];
            let justified = Justifier::new(&records).justify(delta);
            deltas[first * 2..last * 2].copy_from_slice(&justified);
            tracing::debug!(pass = passes, delta, records = records.len(), "justify line");

            let mut rejustify = false;
            let mut run_start = 0;
            for (i, run) in runs.iter_mut().enumerate() {
                let run_limit = run_start + run.char_count();
                if run_limit > start && run_start < limit {
                    let slot = slots[i] * 2;
                    let (justified, again) =
                        run.apply_justification(&deltas[slot..slot + run.char_count() * 2]);
                    *run = justified;
                    rejustify |= again;
                }
                run_start = run_limit;
            }
            if !rejustify || passes >= 2 {
                break;
            }
        }
        Ok(Some(Self::new(
            runs,
            [
                self.baseline_offsets[0],
                self.baseline_offsets[1],
                self.baseline_offsets[2],
            ],
            self.text.clone(),
            self.range.clone(),
            self.ordering.clone(),
        )))
    }
}

/// Sum of the advances of characters `start..limit` over `runs` in logical order.
pub(crate) fn advance_between(runs: &[GlyphRun], start: usize, limit: usize) -> f32 {
    let mut advance = 0.0;
    let mut run_start = 0;
    for run in runs {
        let run_limit = run_start + run.char_count();
        if run_limit > start && run_start < limit {
            let min = start.saturating_sub(run_start);
            let max = run.char_count().min(limit - run_start);
            advance += run.advance_between(min, max);
        }
        if run_limit >= limit {
            break;
        }
        run_start = run_limit;
    }
    advance
}

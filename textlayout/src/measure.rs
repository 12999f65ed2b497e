// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measuring and laying out lines of a paragraph without shaping all of it.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::bidi::BidiOrdering;
use crate::context::LayoutContext;
use crate::error::Error;
use crate::layout::{analyze_bidi, paragraph_baseline, shaped_chars, Layout, ParagraphInfo};
use crate::line::Line;
use crate::line_break::BreakOpportunities;
use crate::paragraph::ParagraphStyleIndex;
use crate::segment::{RunSegmenter, StyleSource};
use crate::shape::{Baseline, GlyphRun};
use crate::text::StyledText;

/// How many average lines a layout window spans once lines have been produced.
const WINDOW_LINES: f32 = 2.1;

/// Shaped runs over a part of the paragraph.
#[derive(Clone, Debug)]
struct Window {
    runs: Vec<GlyphRun>,
    start: usize,
    limit: usize,
}

impl Window {
    fn covers(&self, start: usize, limit: usize) -> bool {
        start >= self.start && limit <= self.limit
    }

    /// Index of the run containing `pos` and the start of that run.
    fn run_at(&self, pos: usize) -> (usize, usize) {
        let mut run_start = self.start;
        for (i, run) in self.runs.iter().enumerate() {
            let run_limit = run_start + run.char_count();
            if run_limit > pos {
                return (i, run_start);
            }
            run_start = run_limit;
        }
        (self.runs.len(), run_start)
    }
}

/// Measures lines of a paragraph and lays them out.
///
/// Glyph runs are shaped for a window of the paragraph around the requested lines, which is
/// widened on demand and thrown away when the paragraph is edited. Offsets are logical indices,
/// starting at [`StyledText::start`].
///
/// A measurer holds mutable state and answers queries through `&mut self`.
pub struct IncrementalMeasurer {
    cx: LayoutContext,
    start: usize,
    chars: Arc<[char]>,
    ordering: BidiOrdering,
    styles: ParagraphStyleIndex,
    baseline: Baseline,
    baseline_offsets: [f32; 3],
    justification: f32,
    window: Option<Window>,
    /// A window was sized for line breaking since the last edit.
    have_layout_window: bool,
    breaks: Option<Box<dyn BreakOpportunities>>,
    /// Lines produced, not counting the last line of the paragraph.
    layout_count: usize,
    layout_char_count: usize,
}

impl core::fmt::Debug for IncrementalMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IncrementalMeasurer")
            .field("start", &self.start)
            .field("len", &self.chars.len())
            .field("ordering", &self.ordering)
            .field("baseline", &self.baseline)
            .field("window", &self.window.as_ref().map(|w| w.start..w.limit))
            .field("layout_count", &self.layout_count)
            .finish_non_exhaustive()
    }
}

impl IncrementalMeasurer {
    /// Creates a measurer over `text`, which must not be empty.
    pub fn new(cx: &LayoutContext, text: &StyledText) -> Result<Self, Error> {
        if text.is_empty() {
            return Err(Error::invalid_argument("IncrementalMeasurer::new"));
        }
        let info = ParagraphInfo::new(cx, text);
        Ok(Self {
            cx: cx.clone(),
            start: text.start(),
            chars: info.chars,
            ordering: info.ordering,
            styles: ParagraphStyleIndex::new(text),
            baseline: info.baseline,
            baseline_offsets: info.baseline_offsets,
            justification: info.justification,
            window: None,
            have_layout_window: false,
            breaks: None,
            layout_count: 0,
            layout_char_count: 0,
        })
    }

    /// Characters of the paragraph, after numeric shaping.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Logical index of the first character.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Logical index past the last character.
    pub fn limit(&self) -> usize {
        self.start + self.chars.len()
    }

    /// Levels of the whole paragraph.
    pub fn ordering(&self) -> &BidiOrdering {
        &self.ordering
    }

    fn local_range(
        &self,
        operation: &'static str,
        start: usize,
        limit: usize,
    ) -> Result<(usize, usize), Error> {
        let len = self.chars.len();
        let local = |i: usize| i as isize - self.start as isize;
        if start < self.start || limit < start || limit > self.limit() {
            return Err(Error::invalid_range(operation, local(start), local(limit), len));
        }
        Ok((start - self.start, limit - self.start))
    }

    /// Index of the first character, at or after `start`, that does not fit when the
    /// characters from `start` on are laid out in `max_advance`.
    ///
    /// Returns the paragraph limit when the rest of the paragraph fits.
    pub fn line_break_index(&mut self, start: usize, max_advance: f32) -> Result<usize, Error> {
        if start < self.start || start >= self.limit() {
            return Err(Error::index_out_of_range(
                "line_break_index",
                start as isize - self.start as isize,
                self.chars.len(),
            ));
        }
        let local = start - self.start;
        let in_window = self
            .window
            .as_ref()
            .is_some_and(|w| local >= w.start && local < w.limit);
        if !self.have_layout_window || !in_window {
            self.make_layout_window(local)?;
        }
        Ok(self.calc_line_break(local, max_advance)? + self.start)
    }

    /// Total advance of `start..limit` laid out as one line.
    pub fn advance_between(&mut self, start: usize, limit: usize) -> Result<f32, Error> {
        let (start, limit) = self.local_range("advance_between", start, limit)?;
        if start == limit {
            return Ok(0.0);
        }
        self.ensure_window(start, limit)?;
        Ok(self.make_line(start, limit)?.metrics().advance)
    }

    /// Layout of `start..limit` as one line.
    pub fn layout(&mut self, start: usize, limit: usize) -> Result<Layout, Error> {
        let (local_start, local_limit) = self.local_range("layout", start, limit)?;
        if local_start == local_limit {
            return Err(Error::invalid_range(
                "layout",
                local_start as isize,
                local_limit as isize,
                self.chars.len(),
            ));
        }
        self.ensure_window(local_start, local_limit)?;
        let line = self.make_line(local_start, local_limit)?;
        if local_limit < self.chars.len() {
            self.layout_char_count += local_limit - local_start;
            self.layout_count += 1;
        }
        Layout::from_line(
            self.cx.shared_shaper(),
            line,
            self.baseline,
            self.baseline_offsets,
            self.justification,
        )
    }

    /// Updates for a character inserted at logical index `pos`; `text` is the edited paragraph.
    pub fn insert_char(&mut self, text: &StyledText, pos: usize) -> Result<(), Error> {
        if text.len() != self.chars.len() + 1 || text.start() != self.start {
            return self.reset(text);
        }
        let local = self.edit_index("insert_char", text, pos)?;
        let chars = shaped_chars(text);
        let bidi = self.cx.bidi();
        let reanalyze = !self.ordering.is_left_to_right()
            || bidi.requires_bidi(&chars[local..=local])
            || text.styles().any(|(_, style)| style.embedding().is_some());
        self.apply_edit(text, chars, reanalyze);
        self.styles.insert_char(text, local)?;
        Ok(())
    }

    /// Updates for the character at logical index `pos` being removed; `text` is the edited
    /// paragraph.
    pub fn delete_char(&mut self, text: &StyledText, pos: usize) -> Result<(), Error> {
        if text.len() + 1 != self.chars.len() || text.start() != self.start || text.is_empty() {
            return self.reset(text);
        }
        let local = pos
            .checked_sub(self.start)
            .filter(|&i| i < self.chars.len())
            .ok_or_else(|| {
                Error::index_out_of_range(
                    "delete_char",
                    pos as isize - self.start as isize,
                    self.chars.len(),
                )
            })?;
        let chars = shaped_chars(text);
        let reanalyze = !self.ordering.is_left_to_right();
        self.apply_edit(text, chars, reanalyze);
        self.styles.delete_char(text, local)?;
        Ok(())
    }

    fn edit_index(
        &self,
        operation: &'static str,
        text: &StyledText,
        pos: usize,
    ) -> Result<usize, Error> {
        pos.checked_sub(text.start())
            .filter(|&i| i < text.len())
            .ok_or_else(|| {
                Error::index_out_of_range(
                    operation,
                    pos as isize - text.start() as isize,
                    text.len(),
                )
            })
    }

    fn apply_edit(&mut self, text: &StyledText, chars: Arc<[char]>, reanalyze: bool) {
        let (baseline, offsets) = paragraph_baseline(self.cx.shaper(), text, &chars);
        self.ordering = if reanalyze {
            tracing::debug!(len = chars.len(), "re-analyzing bidi after edit");
            analyze_bidi(self.cx.bidi(), text, &chars)
        } else {
            BidiOrdering::left_to_right(chars.len())
        };
        self.chars = chars;
        self.baseline = baseline;
        self.baseline_offsets = offsets;
        self.justification = text.paragraph_style().justification_ratio();
        self.invalidate();
    }

    /// Rebuilds everything from `text`.
    fn reset(&mut self, text: &StyledText) -> Result<(), Error> {
        tracing::debug!(len = text.len(), "rebuilding measurer");
        *self = Self::new(&self.cx, text)?;
        Ok(())
    }

    fn invalidate(&mut self) {
        self.window = None;
        self.have_layout_window = false;
        self.breaks = None;
    }

    fn generate_window(&mut self, start: usize, limit: usize) -> Result<(), Error> {
        tracing::debug!(start, limit, "shaping measurer window");
        let runs = RunSegmenter::new(
            self.cx.shaper(),
            &self.chars,
            &self.ordering,
            StyleSource::Paragraph(&self.styles),
        )
        .segment(start..limit)?;
        self.window = Some(Window { runs, start, limit });
        Ok(())
    }

    fn ensure_window(&mut self, start: usize, limit: usize) -> Result<(), Error> {
        if self.window.as_ref().is_some_and(|w| w.covers(start, limit)) {
            return Ok(());
        }
        self.generate_window(start, limit)
    }

    /// Shapes a window starting at the line containing `start`.
    ///
    /// The first window after an edit spans a few average lines when lines have been produced
    /// before. Otherwise it runs to the end of the paragraph. The window is snapped outward to
    /// break opportunities.
    fn make_layout_window(&mut self, start: usize) -> Result<(), Error> {
        let len = self.chars.len();
        let mut window_start = start;
        let mut window_limit = len;
        if self.layout_count > 0 && !self.have_layout_window {
            let average = (self.layout_char_count / self.layout_count).max(1);
            window_limit = (start + (average as f32 * WINDOW_LINES) as usize).min(len);
        }
        if start > 0 || window_limit < len {
            let chars = &self.chars;
            let breaks = self.breaks.get_or_insert_with(|| {
                let mut breaks = self.cx.line_breaks();
                breaks.set_text(chars);
                breaks
            });
            if start > 0 && !breaks.is_boundary(start) {
                window_start = breaks.preceding(start).unwrap_or(0);
            }
            if window_limit < len && !breaks.is_boundary(window_limit) {
                window_limit = breaks.following(window_limit).unwrap_or(len);
            }
        }
        self.generate_window(window_start, window_limit)?;
        self.have_layout_window = true;
        Ok(())
    }

    fn calc_line_break(&mut self, pos: usize, max_advance: f32) -> Result<usize, Error> {
        loop {
            let Some(window) = self.window.as_ref() else {
                return Ok(self.chars.len());
            };
            let (first, mut run_start) = window.run_at(pos);
            let mut start = pos;
            let mut width = max_advance;
            for run in &window.runs[first..] {
                let count = run.char_count();
                let local = start - run_start;
                let index = run.line_break_index(local, width);
                if index < count {
                    return Ok(run_start + index);
                }
                width -= run.advance_between(local, count);
                run_start += count;
                start = run_start;
            }
            if window.limit >= self.chars.len() {
                return Ok(self.chars.len());
            }
            let len = self.chars.len();
            self.generate_window(pos, len)?;
        }
    }

    /// Line over `start..limit`, which the window must cover.
    fn make_line(&self, start: usize, limit: usize) -> Result<Line, Error> {
        let Some(window) = self.window.as_ref() else {
            return Err(Error::invalid_range(
                "make_line",
                start as isize,
                limit as isize,
                self.chars.len(),
            ));
        };
        let ordering = self.ordering.line(&self.chars, start..limit);
        let mut runs = Vec::new();
        let (first, mut run_start) = window.run_at(start);
        for run in &window.runs[first..] {
            if run_start >= limit {
                break;
            }
            let run_limit = run_start + run.char_count();
            let mut piece_start = start.max(run_start);
            let piece_limit = limit.min(run_limit);
            while piece_start < piece_limit {
                let level = ordering.level(piece_start - start);
                let mut piece_end = piece_start + 1;
                while piece_end < piece_limit && ordering.level(piece_end - start) == level {
                    piece_end += 1;
                }
                runs.push(run.subset(
                    piece_start - run_start,
                    piece_end - run_start,
                    Some(level),
                ));
                piece_start = piece_end;
            }
            run_start = run_limit;
        }
        Ok(Line::new(
            runs,
            self.baseline_offsets,
            self.chars.clone(),
            start..limit,
            ordering,
        ))
    }
}

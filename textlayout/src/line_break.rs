// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breaking paragraphs into lines.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use icu_segmenter::options::LineBreakOptions;
use icu_segmenter::LineSegmenter;

use crate::context::LayoutContext;
use crate::error::Error;
use crate::layout::Layout;
use crate::measure::IncrementalMeasurer;
use crate::text::StyledText;

/// Line break opportunities over a text, in character offsets from its start.
///
/// The start and the end of the text are always boundaries.
pub trait BreakOpportunities: Debug {
    /// Replaces the text.
    fn set_text(&mut self, text: &[char]);

    /// First boundary after `offset`.
    fn following(&self, offset: usize) -> Option<usize>;

    /// Last boundary before `offset`.
    fn preceding(&self, offset: usize) -> Option<usize>;

    /// Returns `true` if a line may start at `offset`.
    fn is_boundary(&self, offset: usize) -> bool;
}

/// [`BreakOpportunities`] from the UAX #14 line segmenter of `icu_segmenter`.
#[derive(Clone, Debug, Default)]
pub struct UaxLineBreaks {
    boundaries: Vec<usize>,
}

impl UaxLineBreaks {
    /// Creates an iterator with no text.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BreakOpportunities for UaxLineBreaks {
    fn set_text(&mut self, text: &[char]) {
        let s: String = text.iter().collect();
        let segmenter = LineSegmenter::new_for_non_complex_scripts(LineBreakOptions::default());
        let mut boundaries = Vec::new();
        let mut chars = 0;
        let mut bytes = 0;
        for boundary in segmenter.segment_str(&s) {
            while bytes < boundary && chars < text.len() {
                bytes += text[chars].len_utf8();
                chars += 1;
            }
            boundaries.push(chars);
        }
        if boundaries.first() != Some(&0) {
            boundaries.insert(0, 0);
        }
        if boundaries.last() != Some(&text.len()) {
            boundaries.push(text.len());
        }
        boundaries.dedup();
        self.boundaries = boundaries;
    }

    fn following(&self, offset: usize) -> Option<usize> {
        let i = self.boundaries.partition_point(|&b| b <= offset);
        self.boundaries.get(i).copied()
    }

    fn preceding(&self, offset: usize) -> Option<usize> {
        let i = self.boundaries.partition_point(|&b| b < offset);
        i.checked_sub(1).map(|i| self.boundaries[i])
    }

    fn is_boundary(&self, offset: usize) -> bool {
        self.boundaries.binary_search(&offset).is_ok()
    }
}

/// Produces one [`Layout`] per line of a paragraph, each as wide as a wrapping width allows.
///
/// Lines end at line break opportunities. A line whose first word does not fit is broken
/// inside the word unless the caller asks to keep the next word whole.
///
/// Offsets are logical indices, starting at [`StyledText::start`].
#[derive(Debug)]
pub struct LineBreaker {
    measurer: IncrementalMeasurer,
    breaks: Box<dyn BreakOpportunities>,
    start: usize,
    limit: usize,
    pos: usize,
}

impl LineBreaker {
    /// Creates a breaker positioned at the start of `text`, which must not be empty.
    pub fn new(cx: &LayoutContext, text: &StyledText) -> Result<Self, Error> {
        let measurer = IncrementalMeasurer::new(cx, text)?;
        let mut breaks = cx.line_breaks();
        breaks.set_text(measurer.chars());
        Ok(Self {
            measurer,
            breaks,
            start: text.start(),
            limit: text.limit(),
            pos: text.start(),
        })
    }

    /// Offset of the start of the next line.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves to `position`, which must be within the paragraph.
    pub fn set_position(&mut self, position: usize) -> Result<(), Error> {
        if position < self.start || position > self.limit {
            return Err(Error::index_out_of_range(
                "set_position",
                position as isize - self.start as isize,
                self.limit - self.start,
            ));
        }
        self.pos = position;
        Ok(())
    }

    /// The measurer lines are measured with.
    pub fn measurer(&self) -> &IncrementalMeasurer {
        &self.measurer
    }

    /// End of the next line for `width`, without moving.
    pub fn next_offset(&mut self, width: f32) -> Result<usize, Error> {
        self.next_offset_with(width, self.limit, false)
    }

    /// End of the next line for `width`, at most `offset_limit`, without moving.
    ///
    /// When the first word does not fit, `require_next_word` returns the current position
    /// instead of breaking inside the word.
    pub fn next_offset_with(
        &mut self,
        width: f32,
        offset_limit: usize,
        require_next_word: bool,
    ) -> Result<usize, Error> {
        let pos = self.pos;
        let mut next = pos;
        if pos < self.limit {
            if offset_limit <= pos {
                return Err(Error::invalid_range(
                    "next_offset",
                    pos as isize,
                    offset_limit as isize,
                    self.limit - self.start,
                ));
            }
            let at_max = self.measurer.line_break_index(pos, width)?;
            if at_max == self.limit {
                next = self.limit;
            } else {
                let local = at_max - self.start;
                if self.measurer.chars()[local].is_whitespace() {
                    next = self
                        .breaks
                        .following(local)
                        .map_or(self.limit, |b| b + self.start);
                } else {
                    next = self
                        .breaks
                        .preceding(local + 1)
                        .map_or(self.start, |b| b + self.start);
                    if next <= pos {
                        next = if require_next_word {
                            pos
                        } else {
                            (pos + 1).max(at_max)
                        };
                    }
                }
            }
        }
        Ok(next.min(offset_limit))
    }

    /// The next line for `width`, or `None` at the end of the paragraph.
    pub fn next_layout(&mut self, width: f32) -> Result<Option<Layout>, Error> {
        self.next_layout_with(width, self.limit, false)
    }

    /// The next line for `width` ending at most at `offset_limit`.
    ///
    /// Returns `None` at the end of the paragraph, or when `require_next_word` is set and the
    /// next word does not fit.
    pub fn next_layout_with(
        &mut self,
        width: f32,
        offset_limit: usize,
        require_next_word: bool,
    ) -> Result<Option<Layout>, Error> {
        if self.pos >= self.limit {
            return Ok(None);
        }
        let end = self.next_offset_with(width, offset_limit, require_next_word)?;
        if end == self.pos {
            return Ok(None);
        }
        let layout = self.measurer.layout(self.pos, end)?;
        self.pos = end;
        Ok(Some(layout))
    }

    /// Updates for a character inserted at `pos`; `text` is the edited paragraph. The
    /// position returns to the start of the paragraph.
    pub fn insert_char(&mut self, text: &StyledText, pos: usize) -> Result<(), Error> {
        self.measurer.insert_char(text, pos)?;
        self.reset(text);
        Ok(())
    }

    /// Updates for the character at `pos` being removed; `text` is the edited paragraph. The
    /// position returns to the start of the paragraph.
    pub fn delete_char(&mut self, text: &StyledText, pos: usize) -> Result<(), Error> {
        self.measurer.delete_char(text, pos)?;
        self.reset(text);
        Ok(())
    }

    fn reset(&mut self, text: &StyledText) {
        self.start = text.start();
        self.limit = text.limit();
        self.pos = self.start;
        self.breaks.set_text(self.measurer.chars());
    }
}

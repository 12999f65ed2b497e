// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use crate::error::Error;
use crate::style::{ParagraphStyle, TextStyle};

/// A paragraph of characters with per-character styles.
///
/// Styles are stored as contiguous runs covering the whole text. Indices passed to the methods
/// of this type are relative to the start of the text; [`start`](Self::start) is the logical
/// index of the first character as seen by [`LineBreaker`](crate::LineBreaker) and
/// [`IncrementalMeasurer`](crate::IncrementalMeasurer).
///
/// Editing helpers return a new value rather than mutating, so a text handed to a measurer stays
/// valid while the edited copy is prepared.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledText {
    chars: Arc<[char]>,
    start: usize,
    /// Start index and style of each run, sorted, first start is 0.
    runs: Vec<(usize, TextStyle)>,
    paragraph: ParagraphStyle,
}

impl StyledText {
    /// Creates a text with a single style.
    pub fn new(text: &str, style: TextStyle) -> Self {
        Self::from_chars(text.chars().collect::<Vec<_>>(), style)
    }

    /// Creates a text from characters with a single style.
    pub fn from_chars(chars: impl Into<Arc<[char]>>, style: TextStyle) -> Self {
        Self {
            chars: chars.into(),
            start: 0,
            runs: alloc::vec![(0, style)],
            paragraph: ParagraphStyle::default(),
        }
    }

    /// Returns the text with its first character at logical index `start`.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Returns the text with different paragraph properties.
    pub fn with_paragraph_style(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = paragraph;
        self
    }

    /// Applies `style` to `range`.
    pub fn set_style(&mut self, range: Range<usize>, style: TextStyle) -> Result<(), Error> {
        self.update_style(range, |s| *s = style.clone())
    }

    /// Applies `f` to the style of every character in `range`.
    pub fn update_style(
        &mut self,
        range: Range<usize>,
        mut f: impl FnMut(&mut TextStyle),
    ) -> Result<(), Error> {
        if range.start > range.end || range.end > self.chars.len() {
            return Err(Error::invalid_range(
                "set_style",
                range.start as isize,
                range.end as isize,
                self.chars.len(),
            ));
        }
        if range.is_empty() {
            return Ok(());
        }
        self.split_at(range.start);
        self.split_at(range.end);
        for (start, style) in &mut self.runs {
            if range.contains(start) {
                f(style);
            }
        }
        self.coalesce();
        Ok(())
    }

    /// Splits the run containing `index` so that a run starts there.
    fn split_at(&mut self, index: usize) {
        if index >= self.chars.len() {
            return;
        }
        let run = self.run_index(index);
        if self.runs[run].0 != index {
            let style = self.runs[run].1.clone();
            self.runs.insert(run + 1, (index, style));
        }
    }

    /// Merges adjacent runs with equal styles.
    fn coalesce(&mut self) {
        self.runs.dedup_by(|next, prev| next.1 == prev.1);
    }

    fn run_index(&self, index: usize) -> usize {
        self.runs
            .partition_point(|(start, _)| *start <= index)
            .saturating_sub(1)
    }

    /// The characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub(crate) fn shared_chars(&self) -> Arc<[char]> {
        self.chars.clone()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` when the text has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Logical index of the first character.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Logical index past the last character.
    pub fn limit(&self) -> usize {
        self.start + self.chars.len()
    }

    /// Paragraph properties.
    pub fn paragraph_style(&self) -> &ParagraphStyle {
        &self.paragraph
    }

    /// Style of the character at `index`, which must be in range.
    pub fn style_at(&self, index: usize) -> &TextStyle {
        &self.runs[self.run_index(index)].1
    }

    /// End of the style run containing `index`.
    pub fn run_limit(&self, index: usize) -> usize {
        self.runs
            .get(self.run_index(index) + 1)
            .map_or(self.chars.len(), |(start, _)| *start)
    }

    /// Iterates style runs in order.
    pub fn styles(&self) -> impl Iterator<Item = (Range<usize>, &TextStyle)> + '_ {
        self.runs.iter().enumerate().map(|(i, (start, style))| {
            let end = self
                .runs
                .get(i + 1)
                .map_or(self.chars.len(), |(next, _)| *next);
            (*start..end, style)
        })
    }

    /// Returns `true` when every character has the same style.
    pub fn has_single_style(&self) -> bool {
        self.runs.len() == 1
    }

    /// Returns a copy with `ch` inserted at `index`, styled like the preceding character (or the
    /// following one when inserting at the start).
    pub fn insert_char(&self, index: usize, ch: char) -> Result<Self, Error> {
        if index > self.chars.len() {
            return Err(Error::index_out_of_range(
                "insert_char",
                index as isize,
                self.chars.len(),
            ));
        }
        let style = if self.chars.is_empty() {
            self.runs[0].1.clone()
        } else {
            self.style_at(index.saturating_sub(1)).clone()
        };
        self.insert_char_with_style(index, ch, style)
    }

    /// Returns a copy with `ch` inserted at `index` in `style`.
    pub fn insert_char_with_style(
        &self,
        index: usize,
        ch: char,
        style: TextStyle,
    ) -> Result<Self, Error> {
        if index > self.chars.len() {
            return Err(Error::index_out_of_range(
                "insert_char",
                index as isize,
                self.chars.len(),
            ));
        }
        let mut chars = Vec::with_capacity(self.chars.len() + 1);
        chars.extend_from_slice(&self.chars[..index]);
        chars.push(ch);
        chars.extend_from_slice(&self.chars[index..]);
        let runs = self
            .runs
            .iter()
            .map(|(start, s)| (if *start > index { start + 1 } else { *start }, s.clone()))
            .collect();
        let mut text = Self {
            chars: chars.into(),
            start: self.start,
            runs,
            paragraph: self.paragraph.clone(),
        };
        text.update_style(index..index + 1, |s| *s = style.clone())?;
        Ok(text)
    }

    /// Returns a copy with the character at `index` removed.
    pub fn delete_char(&self, index: usize) -> Result<Self, Error> {
        if index >= self.chars.len() {
            return Err(Error::index_out_of_range(
                "delete_char",
                index as isize,
                self.chars.len(),
            ));
        }
        let mut chars = Vec::with_capacity(self.chars.len() - 1);
        chars.extend_from_slice(&self.chars[..index]);
        chars.extend_from_slice(&self.chars[index + 1..]);
        let mut runs: Vec<(usize, TextStyle)> = Vec::with_capacity(self.runs.len());
        for (i, (start, style)) in self.runs.iter().enumerate() {
            let end = self.runs.get(i + 1).map_or(self.chars.len(), |r| r.0);
            let (start, end) = (
                if *start > index { start - 1 } else { *start },
                if end > index { end - 1 } else { end },
            );
            if start < end {
                runs.push((start, style.clone()));
            }
        }
        let mut text = Self {
            chars: chars.into(),
            start: self.start,
            runs,
            paragraph: self.paragraph.clone(),
        };
        if text.runs.is_empty() {
            text.runs.push((0, self.runs[0].1.clone()));
        }
        text.coalesce();
        Ok(text)
    }
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact decoration and font run tables for a paragraph.

use alloc::vec::Vec;
use core::ops::Range;

use crate::error::Error;
use crate::style::{Decoration, FontOrGraphic};
use crate::text::StyledText;

/// Values over contiguous ranges of a paragraph.
#[derive(Clone, Debug, PartialEq)]
enum RunTable<T> {
    /// One value for the whole paragraph.
    Uniform(T),
    /// `starts` holds one entry per value plus the paragraph length.
    Runs { values: Vec<T>, starts: Vec<usize> },
}

impl<T: PartialEq + Clone> RunTable<T> {
    fn push(&mut self, value: T, index: usize) {
        match self {
            Self::Uniform(current) => {
                if *current != value {
                    let first = current.clone();
                    *self = Self::Runs {
                        values: alloc::vec![first, value],
                        starts: alloc::vec![0, index],
                    };
                }
            }
            Self::Runs { values, starts } => {
                if values.last() != Some(&value) {
                    values.push(value);
                    starts.push(index);
                }
            }
        }
    }

    fn finish(&mut self, len: usize) {
        if let Self::Runs { starts, .. } = self {
            starts.push(len);
        }
    }

    fn run_containing(starts: &[usize], index: usize) -> usize {
        starts.partition_point(|&s| s <= index).saturating_sub(1)
    }

    fn get(&self, index: usize) -> &T {
        match self {
            Self::Uniform(value) => value,
            Self::Runs { values, starts } => &values[Self::run_containing(starts, index)],
        }
    }

    fn run_limit(&self, index: usize, len: usize) -> usize {
        match self {
            Self::Uniform(_) => len,
            Self::Runs { starts, .. } => starts[Self::run_containing(starts, index) + 1],
        }
    }

    fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform(_))
    }

    /// Moves every run start after `index` by one, the sentinel included.
    fn shift_after(&mut self, index: usize, grow: bool) {
        if let Self::Runs { starts, .. } = self {
            for start in starts.iter_mut().rev() {
                if *start <= index {
                    break;
                }
                if grow {
                    *start += 1;
                } else {
                    *start -= 1;
                }
            }
        }
    }

    fn ranges(&self, len: usize) -> Vec<(Range<usize>, &T)> {
        match self {
            Self::Uniform(value) => alloc::vec![(0..len, value)],
            Self::Runs { values, starts } => values
                .iter()
                .enumerate()
                .map(|(i, v)| (starts[i]..starts[i + 1], v))
                .collect(),
        }
    }
}

/// Maps character offsets of a paragraph to their decoration and font or graphic.
///
/// Single-character edits patch the run tables in place when the edit does not touch a style
/// boundary, and rebuild them from the text otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphStyleIndex {
    len: usize,
    decorations: RunTable<Decoration>,
    fonts: RunTable<FontOrGraphic>,
}

impl ParagraphStyleIndex {
    /// Builds the index for `text`.
    pub fn new(text: &StyledText) -> Self {
        let first = text.style_at(0);
        let mut index = Self {
            len: text.len(),
            decorations: RunTable::Uniform(first.decoration),
            fonts: RunTable::Uniform(first.font_or_graphic()),
        };
        for (range, style) in text.styles().skip(1) {
            index.decorations.push(style.decoration, range.start);
            index.fonts.push(style.font_or_graphic(), range.start);
        }
        index.decorations.finish(index.len);
        index.fonts.finish(index.len);
        index
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no characters are covered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` when a single decoration and font cover the paragraph.
    pub fn is_uniform(&self) -> bool {
        self.decorations.is_uniform() && self.fonts.is_uniform()
    }

    fn check(&self, index: usize) -> Result<(), Error> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::index_out_of_range(
                "paragraph style lookup",
                index as isize,
                self.len,
            ))
        }
    }

    /// Decoration and font or graphic of the character at `index`.
    pub fn lookup(&self, index: usize) -> Result<(Decoration, &FontOrGraphic), Error> {
        self.check(index)?;
        Ok((*self.decorations.get(index), self.fonts.get(index)))
    }

    /// Decoration of the character at `index`.
    pub fn decoration_at(&self, index: usize) -> Result<Decoration, Error> {
        self.check(index)?;
        Ok(*self.decorations.get(index))
    }

    /// Font or graphic of the character at `index`.
    pub fn font_or_graphic_at(&self, index: usize) -> Result<&FontOrGraphic, Error> {
        self.check(index)?;
        Ok(self.fonts.get(index))
    }

    /// First offset after `index` where the decoration or the font changes.
    pub fn run_limit(&self, index: usize) -> Result<usize, Error> {
        self.check(index)?;
        Ok(self
            .decorations
            .run_limit(index, self.len)
            .min(self.fonts.run_limit(index, self.len)))
    }

    /// Decoration runs in order.
    pub fn decoration_runs(&self) -> impl Iterator<Item = (Range<usize>, Decoration)> + '_ {
        self.decorations
            .ranges(self.len)
            .into_iter()
            .map(|(range, d)| (range, *d))
    }

    /// Font or graphic runs in order.
    pub fn font_runs(&self) -> impl Iterator<Item = (Range<usize>, &FontOrGraphic)> + '_ {
        self.fonts.ranges(self.len).into_iter()
    }

    /// Updates the index after a character was inserted at `pos`; `text` is the edited
    /// paragraph.
    ///
    /// Returns `true` when the tables were patched in place, `false` when they were rebuilt.
    pub fn insert_char(&mut self, text: &StyledText, pos: usize) -> Result<bool, Error> {
        if pos >= text.len() {
            return Err(Error::index_out_of_range(
                "insert_char",
                pos as isize,
                text.len(),
            ));
        }
        if text.len() != self.len + 1 || self.len == 0 {
            self.rebuild(text);
            return Ok(false);
        }
        let relative = pos.saturating_sub(1);
        let style = text.style_at(pos);
        let (decoration, font) = self.lookup(relative)?;
        if decoration != style.decoration || *font != style.font_or_graphic() {
            self.rebuild(text);
            return Ok(false);
        }
        self.len += 1;
        self.decorations.shift_after(relative, true);
        self.fonts.shift_after(relative, true);
        tracing::trace!(pos, len = self.len, "patched style index after insert");
        Ok(true)
    }

    /// Updates the index after the character at `pos` was removed; `text` is the edited
    /// paragraph.
    ///
    /// Returns `true` when the tables were patched in place, `false` when they were rebuilt.
    pub fn delete_char(&mut self, text: &StyledText, pos: usize) -> Result<bool, Error> {
        if pos >= self.len {
            return Err(Error::index_out_of_range(
                "delete_char",
                pos as isize,
                self.len,
            ));
        }
        if text.len() + 1 != self.len {
            self.rebuild(text);
            return Ok(false);
        }
        if self.is_uniform() {
            self.len -= 1;
            return Ok(true);
        }
        if self.run_limit(pos)? == pos + 1 && (pos == 0 || self.run_limit(pos - 1)? == pos) {
            self.rebuild(text);
            return Ok(false);
        }
        self.len -= 1;
        self.decorations.shift_after(pos, false);
        self.fonts.shift_after(pos, false);
        tracing::trace!(pos, len = self.len, "patched style index after delete");
        Ok(true)
    }

    fn rebuild(&mut self, text: &StyledText) {
        tracing::trace!(len = text.len(), "rebuilding style index");
        *self = Self::new(text);
    }
}

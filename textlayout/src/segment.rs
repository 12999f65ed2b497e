// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use crate::bidi::BidiOrdering;
use crate::error::Error;
use crate::paragraph::ParagraphStyleIndex;
use crate::shape::{GlyphRun, Shaper};
use crate::style::{Decoration, FontOrGraphic};

/// Where a [`RunSegmenter`] gets styles from.
#[derive(Clone, Copy, Debug)]
pub enum StyleSource<'a> {
    /// One font or graphic and one decoration for the whole text.
    Single {
        /// What every character is drawn with.
        font_or_graphic: &'a FontOrGraphic,
        /// Decoration of every character.
        decoration: Decoration,
    },
    /// Per-character styles.
    Paragraph(&'a ParagraphStyleIndex),
}

impl StyleSource<'_> {
    fn run_at(
        &self,
        index: usize,
        limit: usize,
    ) -> Result<(usize, Decoration, &FontOrGraphic), Error> {
        match self {
            Self::Single {
                font_or_graphic,
                decoration,
            } => Ok((limit, *decoration, font_or_graphic)),
            Self::Paragraph(styles) => {
                let (decoration, font) = styles.lookup(index)?;
                Ok((styles.run_limit(index)?.min(limit), decoration, font))
            }
        }
    }
}

/// Cuts a range of text into glyph runs of constant style and bidi level and shapes each one.
#[derive(Clone, Copy, Debug)]
pub struct RunSegmenter<'a> {
    shaper: &'a dyn Shaper,
    text: &'a [char],
    bidi: &'a BidiOrdering,
    styles: StyleSource<'a>,
}

impl<'a> RunSegmenter<'a> {
    /// Creates a segmenter over `text`, whose levels are given by `bidi`.
    pub fn new(
        shaper: &'a dyn Shaper,
        text: &'a [char],
        bidi: &'a BidiOrdering,
        styles: StyleSource<'a>,
    ) -> Self {
        Self {
            shaper,
            text,
            bidi,
            styles,
        }
    }

    /// End of the run of characters at the level of `start`, at most `limit`.
    fn level_run_end(&self, start: usize, limit: usize) -> usize {
        if self.bidi.is_left_to_right() {
            return limit;
        }
        let level = self.bidi.level(start);
        let mut end = start + 1;
        while end < limit && self.bidi.level(end) == level {
            end += 1;
        }
        end
    }

    /// Shapes `range` into runs in logical order.
    ///
    /// Fails when the shaper returns runs that do not cover exactly the characters it was given.
    pub fn segment(&self, range: Range<usize>) -> Result<Vec<GlyphRun>, Error> {
        if range.start > range.end || range.end > self.text.len() {
            return Err(Error::invalid_range(
                "segment",
                range.start as isize,
                range.end as isize,
                self.text.len(),
            ));
        }
        let mut runs = Vec::new();
        let mut pos = range.start;
        while pos < range.end {
            let (style_limit, decoration, font_or_graphic) = self.styles.run_at(pos, range.end)?;
            while pos < style_limit {
                let chunk = pos..self.level_run_end(pos, style_limit);
                let level = self.bidi.level(pos);
                match font_or_graphic {
                    FontOrGraphic::Graphic(graphic) => {
                        runs.push(
                            GlyphRun::from_graphic(graphic.clone(), level, &self.text[chunk.clone()])
                                .with_decoration(decoration),
                        );
                    }
                    FontOrGraphic::Font(font) => {
                        let shaped = self.shaper.shape(font, self.text, chunk.clone(), level);
                        let count: usize = shaped.iter().map(GlyphRun::char_count).sum();
                        if count != chunk.len() {
                            return Err(Error::char_count_mismatch("segment", chunk.len(), count));
                        }
                        runs.extend(
                            shaped
                                .into_iter()
                                .filter(|run| run.char_count() != 0)
                                .map(|run| run.with_decoration(decoration)),
                        );
                    }
                }
                pos = chunk.end;
            }
        }
        Ok(runs)
    }
}

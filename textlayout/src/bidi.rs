// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional analysis and the orderings derived from embedding levels.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use unicode_bidi::{BidiClass, BidiInfo, Level};

use crate::style::RunDirection;

/// Result of running the bidirectional algorithm over a paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidiAnalysis {
    /// Paragraph embedding level, 0 for left-to-right and 1 for right-to-left.
    pub base_level: u8,
    /// Resolved level of each character, `None` when every character is at level 0.
    pub levels: Option<Vec<u8>>,
}

/// The Unicode bidirectional algorithm as a collaborator.
pub trait BidiAnalyzer: Debug + Send + Sync {
    /// Resolves embedding levels for `text`.
    ///
    /// `embeddings`, when present, holds one explicit embedding value per character using the
    /// convention of [`TextStyle::bidi_embedding`](crate::TextStyle::bidi_embedding). A `None`
    /// `direction` derives the base direction from the first strong character, defaulting to
    /// left-to-right.
    fn analyze(
        &self,
        text: &[char],
        embeddings: Option<&[i8]>,
        direction: Option<RunDirection>,
    ) -> BidiAnalysis;

    /// Returns `true` if `text` could resolve to anything other than uniform level 0.
    fn requires_bidi(&self, text: &[char]) -> bool {
        self.analyze(text, None, None).levels.is_some()
    }
}

/// [`BidiAnalyzer`] backed by the `unicode-bidi` crate.
///
/// Explicit embeddings are expressed by wrapping each embedded stretch in the matching
/// embedding or override control character before analysis. Each stretch pushes one level, so
/// embedding values select the direction rather than an absolute depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeBidi;

const LRE: char = '\u{202A}';
const RLE: char = '\u{202B}';
const PDF: char = '\u{202C}';
const LRO: char = '\u{202D}';
const RLO: char = '\u{202E}';

impl BidiAnalyzer for UnicodeBidi {
    fn analyze(
        &self,
        text: &[char],
        embeddings: Option<&[i8]>,
        direction: Option<RunDirection>,
    ) -> BidiAnalysis {
        let mut source = String::with_capacity(text.len() + 8);
        let mut byte_offsets = Vec::with_capacity(text.len());
        let mut current = 0_i8;
        for (i, &ch) in text.iter().enumerate() {
            let embedding = embeddings.and_then(|e| e.get(i).copied()).unwrap_or(0);
            if embedding != current {
                if current != 0 {
                    source.push(PDF);
                }
                if embedding != 0 {
                    source.push(match (embedding < 0, embedding & 1 != 0) {
                        (false, false) => LRE,
                        (false, true) => RLE,
                        (true, false) => LRO,
                        (true, true) => RLO,
                    });
                }
                current = embedding;
            }
            byte_offsets.push(source.len());
            source.push(ch);
        }
        if current != 0 {
            source.push(PDF);
        }
        let level = direction.map(|d| match d {
            RunDirection::Ltr => Level::ltr(),
            RunDirection::Rtl => Level::rtl(),
        });
        let info = BidiInfo::new(&source, level);
        let base_level = info
            .paragraphs
            .first()
            .map(|p| p.level.number())
            .or(level.map(|l| l.number()))
            .unwrap_or(0);
        let levels: Vec<u8> = byte_offsets
            .iter()
            .map(|&b| info.levels.get(b).map_or(base_level, |l| l.number()))
            .collect();
        if base_level == 0 && levels.iter().all(|&l| l == 0) {
            BidiAnalysis {
                base_level,
                levels: None,
            }
        } else {
            BidiAnalysis {
                base_level,
                levels: Some(levels),
            }
        }
    }

    fn requires_bidi(&self, text: &[char]) -> bool {
        text.iter().any(|&ch| {
            matches!(
                unicode_bidi::bidi_class(ch),
                BidiClass::R
                    | BidiClass::AL
                    | BidiClass::AN
                    | BidiClass::RLE
                    | BidiClass::RLO
                    | BidiClass::RLI
                    | BidiClass::FSI
                    | BidiClass::LRE
                    | BidiClass::LRO
                    | BidiClass::LRI
                    | BidiClass::PDF
                    | BidiClass::PDI
            )
        })
    }
}

/// Embedding levels of a paragraph or line with the visual orderings they imply.
///
/// A purely left-to-right text stores no tables: every level is 0 and both orderings are the
/// identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidiOrdering {
    base_level: u8,
    len: usize,
    levels: Option<Arc<[u8]>>,
    /// Visual index to logical index.
    visual_to_logical: Option<Arc<[usize]>>,
    /// Logical index to visual index.
    logical_to_visual: Option<Arc<[usize]>>,
}

impl BidiOrdering {
    /// Runs `analyzer` over `text` and derives orderings from the result.
    pub fn analyze(
        analyzer: &dyn BidiAnalyzer,
        text: &[char],
        embeddings: Option<&[i8]>,
        direction: Option<RunDirection>,
    ) -> Self {
        let analysis = analyzer.analyze(text, embeddings, direction);
        Self::from_levels(text.len(), analysis.base_level, analysis.levels)
    }

    /// Orderings for a uniformly left-to-right text of `len` characters.
    pub fn left_to_right(len: usize) -> Self {
        Self {
            base_level: 0,
            len,
            levels: None,
            visual_to_logical: None,
            logical_to_visual: None,
        }
    }

    /// Derives orderings from explicit levels.
    pub fn from_levels(len: usize, base_level: u8, levels: Option<Vec<u8>>) -> Self {
        let Some(levels) = levels.filter(|l| base_level != 0 || l.iter().any(|&x| x != 0))
        else {
            return Self::left_to_right(len);
        };
        let visual_to_logical = visual_to_logical_map(&levels);
        let logical_to_visual = inverse_map(&visual_to_logical);
        Self {
            base_level,
            len,
            levels: Some(levels.into()),
            visual_to_logical: Some(visual_to_logical.into()),
            logical_to_visual: Some(logical_to_visual.into()),
        }
    }

    /// Levels for the sub-range `range` laid out as its own line.
    ///
    /// Trailing whitespace on the line is reset to the paragraph level before reordering.
    pub fn line(&self, text: &[char], range: Range<usize>) -> Self {
        let Some(levels) = &self.levels else {
            return Self::left_to_right(range.len());
        };
        let mut line_levels = levels[range.clone()].to_vec();
        for (level, ch) in line_levels.iter_mut().zip(&text[range]).rev() {
            if !ch.is_whitespace() {
                break;
            }
            *level = self.base_level;
        }
        Self::from_levels(line_levels.len(), self.base_level, Some(line_levels))
    }

    /// Returns `true` when every character is at level 0 on a left-to-right base.
    pub fn is_left_to_right(&self) -> bool {
        self.levels.is_none()
    }

    /// Returns `true` when the base direction is left-to-right.
    pub fn is_base_left_to_right(&self) -> bool {
        self.base_level & 1 == 0
    }

    /// The paragraph embedding level.
    pub fn base_level(&self) -> u8 {
        self.base_level
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no characters are covered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Per-character levels, `None` when uniformly left-to-right.
    pub fn levels(&self) -> Option<&[u8]> {
        self.levels.as_deref()
    }

    /// Level of the character at `index`.
    pub fn level(&self, index: usize) -> u8 {
        self.levels
            .as_ref()
            .and_then(|l| l.get(index).copied())
            .unwrap_or(0)
    }

    /// Visual-to-logical table, `None` when it is the identity.
    pub fn visual_to_logical_table(&self) -> Option<&[usize]> {
        self.visual_to_logical.as_deref()
    }

    /// Logical-to-visual table, `None` when it is the identity.
    pub fn logical_to_visual_table(&self) -> Option<&[usize]> {
        self.logical_to_visual.as_deref()
    }

    /// Logical index of the character displayed at visual position `index`.
    pub fn visual_to_logical(&self, index: usize) -> usize {
        self.visual_to_logical
            .as_ref()
            .and_then(|m| m.get(index).copied())
            .unwrap_or(index)
    }

    /// Visual position of the character at logical `index`.
    pub fn logical_to_visual(&self, index: usize) -> usize {
        self.logical_to_visual
            .as_ref()
            .and_then(|m| m.get(index).copied())
            .unwrap_or(index)
    }
}

/// Computes the visual-to-logical permutation for `levels` (rule L2).
///
/// From the highest level down to the lowest odd level, every maximal sequence of characters at
/// that level or higher is reversed.
pub(crate) fn visual_to_logical_map(levels: &[u8]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    let mut max_level = 0;
    let mut lowest_odd_level = u8::MAX;
    for &level in levels {
        max_level = max_level.max(level);
        if level & 1 != 0 && level < lowest_odd_level {
            lowest_odd_level = level;
        }
    }
    if lowest_odd_level > max_level {
        return order;
    }
    let count = levels.len();
    for level in (lowest_odd_level..=max_level).rev() {
        let mut i = 0;
        while i < count {
            if levels[order[i]] >= level {
                let mut end = i + 1;
                while end < count && levels[order[end]] >= level {
                    end += 1;
                }
                order[i..end].reverse();
                i = end;
            }
            i += 1;
        }
    }
    order
}

/// Inverts a permutation.
pub(crate) fn inverse_map(map: &[usize]) -> Vec<usize> {
    let mut inverse = alloc::vec![0; map.len()];
    for (i, &j) in map.iter().enumerate() {
        inverse[j] = i;
    }
    inverse
}

/// Replaces arbitrary distinct ranks with `0..n` preserving their order.
pub(crate) fn contiguous_order(values: &[usize]) -> Vec<usize> {
    let mut sorted: Vec<usize> = (0..values.len()).collect();
    sorted.sort_by_key(|&i| values[i]);
    inverse_map(&sorted)
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic collaborators.

use core::ops::Range;

use peniko::kurbo::{BezPath, Rect, Shape};

use crate::{
    BidiAnalysis, BidiAnalyzer, Cluster, FontSpec, GlyphRun, RunDirection, RunMetrics, Shaper,
    UnicodeBidi,
};

/// Every character advances by 0.6 of the font size, except combining marks which advance by
/// nothing. Ideographs are shaped as separate runs from their neighbors.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TestShaper;

fn is_mark(ch: char) -> bool {
    matches!(ch as u32, 0x0300..0x0370)
}

fn is_ideograph(ch: char) -> bool {
    matches!(ch as u32, 0x4E00..0xA000)
}

fn advance_of(ch: char, size: f32) -> f32 {
    if is_mark(ch) { 0.0 } else { size * 0.6 }
}

fn ink(advance: f32, size: f32) -> Rect {
    Rect::new(0.0, -f64::from(size * 0.7), f64::from(advance), 0.0)
}

impl Shaper for TestShaper {
    fn metrics(&self, font: &FontSpec, _text: &[char]) -> RunMetrics {
        let mut metrics = RunMetrics::from_size(font.size);
        metrics.italic_angle = font.style.slant();
        metrics.ss_offset = font.superscript_offset();
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
        let mut runs = Vec::new();
        let mut start = range.start;
        while start < range.end {
            let ideographic = is_ideograph(text[start]);
            let mut end = start + 1;
            while end < range.end && is_ideograph(text[end]) == ideographic {
                end += 1;
            }
            let clusters = text[start..end]
                .iter()
                .map(|&ch| {
                    let advance = advance_of(ch, font.size);
                    if ch.is_whitespace() || advance == 0.0 {
                        Cluster::simple(ch, ch as u32, advance)
                    } else {
                        Cluster::with_bounds(ch, ch as u32, advance, ink(advance, font.size))
                    }
                })
                .collect();
            runs.push(GlyphRun::from_clusters(font.clone(), metrics, level, clusters));
            start = end;
        }
        runs
    }

    fn glyph_outline(&self, font: &FontSpec, glyph_id: u32) -> Option<BezPath> {
        let ch = char::from_u32(glyph_id)?;
        let advance = advance_of(ch, font.size);
        if ch.is_whitespace() || advance == 0.0 {
            return None;
        }
        Some(ink(advance, font.size).to_path(0.1))
    }
}

/// Reads upper-case ASCII letters as Hebrew, so right-to-left text can be written in tests.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TestBidi;

fn as_hebrew(ch: char) -> char {
    if ch.is_ascii_uppercase() {
        char::from_u32(0x05D0 + (ch as u32 - 'A' as u32)).unwrap_or(ch)
    } else {
        ch
    }
}

impl BidiAnalyzer for TestBidi {
    fn analyze(
        &self,
        text: &[char],
        embeddings: Option<&[i8]>,
        direction: Option<RunDirection>,
    ) -> BidiAnalysis {
        let mapped: Vec<char> = text.iter().copied().map(as_hebrew).collect();
        UnicodeBidi.analyze(&mapped, embeddings, direction)
    }

    fn requires_bidi(&self, text: &[char]) -> bool {
        text.iter().any(char::is_ascii_uppercase) || UnicodeBidi.requires_bidi(text)
    }
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping interface and shaped runs.

mod run;
#[cfg(feature = "skrifa")]
mod skrifa_shaper;

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use peniko::kurbo::BezPath;

use crate::style::FontSpec;

pub use run::{Cluster, Glyph, GlyphRun, RunContent};
#[cfg(feature = "skrifa")]
pub use skrifa_shaper::SkrifaShaper;

/// A baseline that text can be aligned on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Baseline {
    /// The alphabetic baseline of Latin and similar scripts.
    #[default]
    Roman,
    /// The center baseline of ideographic scripts.
    Center,
    /// The hanging baseline of Devanagari and similar scripts.
    Hanging,
}

impl Baseline {
    /// Index into a baseline offset table.
    pub fn index(self) -> usize {
        match self {
            Self::Roman => 0,
            Self::Center => 1,
            Self::Hanging => 2,
        }
    }
}

/// Where a run is placed vertically on its line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunBaseline {
    /// On one of the line's baselines.
    Text(Baseline),
    /// Top aligned with the top of the line.
    Top,
    /// Bottom aligned with the bottom of the line.
    Bottom,
}

impl Default for RunBaseline {
    fn default() -> Self {
        Self::Text(Baseline::Roman)
    }
}

/// Vertical metrics of a shaped run.
///
/// Distances are positive; y grows downward, so the top of the run is at `-ascent`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Distance from the baseline to the top of the run.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the run.
    pub descent: f32,
    /// Recommended additional space between lines.
    pub leading: f32,
    /// Baseline the run sits on.
    pub baseline: RunBaseline,
    /// Offsets of the roman, center and hanging baselines from the roman baseline.
    pub baseline_offsets: [f32; 3],
    /// Offset from the baseline to the strikethrough.
    pub strikethrough_offset: f32,
    /// Thickness of the strikethrough.
    pub strikethrough_size: f32,
    /// Offset from the baseline to the underline.
    pub underline_offset: f32,
    /// Thickness of the underline.
    pub underline_size: f32,
    /// Superscript or subscript shift of the run's baseline.
    pub ss_offset: f32,
    /// Slope of the glyphs, run over rise, positive leaning right.
    pub italic_angle: f32,
}

impl RunMetrics {
    /// Generic metrics proportional to `size`, for shapers without real font data.
    pub fn from_size(size: f32) -> Self {
        Self {
            ascent: size * 0.8,
            descent: size * 0.2,
            leading: 0.0,
            baseline: RunBaseline::default(),
            baseline_offsets: [0.0, -size * 0.3, -size * 0.6],
            strikethrough_offset: -size * 0.3,
            strikethrough_size: size / 12.0,
            underline_offset: size / 10.0,
            underline_size: size / 12.0,
            ss_offset: 0.0,
            italic_angle: 0.0,
        }
    }

    /// Ascent plus descent.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Returns `true` when the run is placed against an edge of the line.
    pub fn is_edge_aligned(&self) -> bool {
        matches!(self.baseline, RunBaseline::Top | RunBaseline::Bottom)
    }

    /// Vertical offset of the run's origin given the line's extended baseline table
    /// `[roman, center, hanging, bottom, top]`.
    pub(crate) fn effective_baseline_offset(&self, offsets: &[f32; 5]) -> f32 {
        match self.baseline {
            RunBaseline::Top => offsets[4] + self.ascent,
            RunBaseline::Bottom => offsets[3] - self.descent,
            RunBaseline::Text(b) => offsets[b.index()],
        }
    }
}

/// Offsets of `offsets` relative to the entry for `baseline`.
pub(crate) fn normalize_offsets(offsets: [f32; 3], baseline: Baseline) -> [f32; 3] {
    let base = offsets[baseline.index()];
    offsets.map(|o| o - base)
}

/// Converts text into glyph runs.
///
/// Implementations are expected to be deterministic: shaping the same characters with the same
/// font and level produces the same runs.
pub trait Shaper: Debug + Send + Sync {
    /// Line metrics of `font`, used to pick the paragraph baseline.
    ///
    /// `text` is the paragraph, for shapers whose metrics depend on script.
    fn metrics(&self, font: &FontSpec, text: &[char]) -> RunMetrics;

    /// Shapes `text[range]`, all of whose characters are at bidi `level`.
    ///
    /// The returned runs must be in logical order and cover exactly the characters of `range`.
    /// More than one run may be returned, for example when part of the range falls back to a
    /// different font.
    fn shape(
        &self,
        font: &FontSpec,
        text: &[char],
        range: Range<usize>,
        level: u8,
    ) -> Vec<GlyphRun>;

    /// Outline of a glyph with its origin at `(0, 0)`, in layout units with y down.
    fn glyph_outline(&self, font: &FontSpec, glyph_id: u32) -> Option<BezPath> {
        let _ = (font, glyph_id);
        None
    }
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout of a single line of styled, bidirectional text.
//!
//! This crate takes a paragraph of characters with per-character style and produces positioned
//! [`GlyphRun`]s gathered into a [`Line`], wrapped by an immutable [`Layout`] that answers the
//! questions an editor asks of a line of text: where is the caret for this offset, which
//! character is under this point, what shape highlights this selection, and how does the line
//! look when justified to a given width.
//!
//! Shaping, the Unicode bidirectional algorithm and break iteration are collaborators behind
//! narrow traits ([`Shaper`], [`BidiAnalyzer`], [`BreakOpportunities`]). Default implementations
//! are provided on top of `unicode-bidi`, `icu_segmenter` and (with the `skrifa` feature)
//! `skrifa`.
//!
//! Long paragraphs are broken into lines by a [`LineBreaker`], which drives an
//! [`IncrementalMeasurer`] that only shapes the part of the paragraph it needs.
//!
//! ## Features
//!
//! - `skrifa` (enabled by default): [`SkrifaShaper`], a shaping collaborator that reads
//!   metrics and outlines straight from font files.
//!
//! ## Example
//!
//! ```
//! use textlayout::{LayoutContext, LineBreaker, StyledText, TextStyle};
//! # use textlayout::{Shaper, FontSpec, RunMetrics, GlyphRun, Cluster};
//! # use core::ops::Range;
//! # #[derive(Debug)]
//! # struct Mono;
//! # impl Shaper for Mono {
//! #     fn metrics(&self, font: &FontSpec, _text: &[char]) -> RunMetrics {
//! #         RunMetrics::from_size(font.size)
//! #     }
//! #     fn shape(&self, font: &FontSpec, text: &[char], range: Range<usize>, level: u8) -> Vec<GlyphRun> {
//! #         let clusters = text[range].iter().map(|&ch| Cluster::simple(ch, ch as u32, font.size * 0.5)).collect();
//! #         vec![GlyphRun::from_clusters(font.clone(), self.metrics(font, text), level, clusters)]
//! #     }
//! # }
//!
//! let cx = LayoutContext::new(Mono);
//! let text = StyledText::new("The quick brown fox", TextStyle::default());
//! let mut breaker = LineBreaker::new(&cx, &text).unwrap();
//! let mut lines = 0;
//! while let Some(layout) = breaker.next_layout(60.0).unwrap() {
//!     assert!(layout.visible_advance() <= 60.0);
//!     lines += 1;
//! }
//! assert_eq!(lines, 2);
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod bidi;
mod context;
mod error;
mod justify;
mod layout;
mod line;
mod line_break;
mod measure;
mod numeric;
mod paragraph;
mod render;
mod segment;
mod shape;
mod style;
mod text;

#[cfg(test)]
mod tests;

pub use peniko::kurbo;

pub use bidi::{BidiAnalysis, BidiAnalyzer, BidiOrdering, UnicodeBidi};
pub use context::LayoutContext;
pub use error::{Error, ErrorKind};
pub use justify::{JustificationInfo, JustificationPriority, Justifier};
pub use layout::{
    CaretInfo, CaretPolicy, CaretShapes, DefaultCaretPolicy, HitTestOptions, Layout, TextHit,
};
pub use line::{Line, LineMetrics};
pub use line_break::{BreakOpportunities, LineBreaker, UaxLineBreaks};
pub use measure::IncrementalMeasurer;
pub use numeric::{DigitScript, NumericShaper};
pub use paragraph::ParagraphStyleIndex;
pub use render::{Painter, PositionedGlyph};
pub use segment::{RunSegmenter, StyleSource};
#[cfg(feature = "skrifa")]
pub use shape::SkrifaShaper;
pub use shape::{Baseline, Cluster, Glyph, GlyphRun, RunBaseline, RunContent, RunMetrics, Shaper};
pub use style::{
    Decoration, FontOrGraphic, FontSpec, FontStyle, FontWeight, FontWidth, Graphic,
    GraphicAlignment, ParagraphStyle, RunDirection, TextStyle,
};
pub use text::StyledText;

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character and paragraph styles.

mod font;

use alloc::sync::Arc;

pub use font::{FontSpec, FontStyle, FontWeight, FontWidth};

use crate::justify::JustificationInfo;
use crate::numeric::NumericShaper;
use crate::shape::{RunBaseline, RunMetrics};
use peniko::kurbo::{Affine, Rect};

/// Text decorations drawn with a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Decoration {
    /// Draw an underline.
    pub underline: bool,
    /// Draw a line through the text.
    pub strikethrough: bool,
}

impl Decoration {
    /// No decoration.
    pub const NONE: Self = Self {
        underline: false,
        strikethrough: false,
    };

    /// Returns `true` when nothing is drawn.
    pub fn is_none(self) -> bool {
        !self.underline && !self.strikethrough
    }
}

/// How an inline graphic sits relative to the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GraphicAlignment {
    /// Top of the graphic at the top of the line.
    Top,
    /// Bottom of the graphic at the bottom of the line.
    Bottom,
    /// Origin on the roman baseline.
    #[default]
    Roman,
    /// Origin on the center baseline.
    Center,
    /// Origin on the hanging baseline.
    Hanging,
}

/// An inline graphic that replaces the glyphs of the characters it is applied to.
///
/// Each character styled with a graphic is drawn as one copy of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Graphic {
    /// Caller-defined identifier, passed back to the [`Painter`](crate::Painter).
    pub id: u64,
    /// Alignment on the line.
    pub alignment: GraphicAlignment,
    /// Advance of each copy.
    pub advance: f32,
    /// Distance from the origin to the top.
    pub ascent: f32,
    /// Distance from the origin to the bottom.
    pub descent: f32,
}

impl Graphic {
    /// Creates a graphic with the given box.
    pub fn new(id: u64, advance: f32, ascent: f32, descent: f32) -> Self {
        Self {
            id,
            alignment: GraphicAlignment::Roman,
            advance,
            ascent,
            descent,
        }
    }

    /// Returns the graphic with a different alignment.
    pub fn with_alignment(mut self, alignment: GraphicAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Bounds of one copy relative to its origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            -f64::from(self.ascent),
            f64::from(self.advance),
            f64::from(self.descent),
        )
    }

    /// Metrics of a run made of this graphic.
    pub fn metrics(&self) -> RunMetrics {
        let baseline = match self.alignment {
            GraphicAlignment::Top => RunBaseline::Top,
            GraphicAlignment::Bottom => RunBaseline::Bottom,
            GraphicAlignment::Roman => RunBaseline::Text(crate::Baseline::Roman),
            GraphicAlignment::Center => RunBaseline::Text(crate::Baseline::Center),
            GraphicAlignment::Hanging => RunBaseline::Text(crate::Baseline::Hanging),
        };
        RunMetrics {
            ascent: self.ascent,
            descent: self.descent,
            leading: 0.0,
            baseline,
            baseline_offsets: [0.0, -self.ascent / 2.0, -self.ascent],
            strikethrough_offset: -self.ascent / 2.0,
            strikethrough_size: self.ascent / 12.0,
            underline_offset: self.descent / 3.0,
            underline_size: self.ascent / 12.0,
            ss_offset: 0.0,
            italic_angle: 0.0,
        }
    }

    /// Justification behavior of each copy: may grow by a third of its advance on either side
    /// at inter-character priority, never shrinks.
    pub fn justification_info(&self) -> JustificationInfo {
        JustificationInfo {
            weight: self.advance,
            grow_absorb: false,
            grow_priority: crate::JustificationPriority::InterCharacter,
            grow_left_limit: self.advance / 3.0,
            grow_right_limit: self.advance / 3.0,
            shrink_absorb: false,
            shrink_priority: crate::JustificationPriority::Whitespace,
            shrink_left_limit: 0.0,
            shrink_right_limit: 0.0,
        }
    }
}

/// What a character is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub enum FontOrGraphic {
    /// Glyphs from a font.
    Font(FontSpec),
    /// An inline graphic.
    Graphic(Graphic),
}

/// Style of a run of characters.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name.
    pub family: Arc<str>,
    /// Font size.
    pub size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Font width.
    pub width: FontWidth,
    /// Font posture.
    pub style: FontStyle,
    /// Explicit font request, used instead of the properties above when set.
    pub font: Option<FontSpec>,
    /// Glyph transform.
    pub transform: Option<Affine>,
    /// Superscript (positive) or subscript (negative) steps.
    pub superscript: i8,
    /// Replaces glyphs with an inline graphic when set.
    pub graphic: Option<Graphic>,
    /// Decorations.
    pub decoration: Decoration,
    /// Explicit bidi embedding: `1..=61` embeds at that level, `-61..=-1` overrides at the
    /// absolute level. Other values are ignored.
    pub bidi_embedding: i8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: Arc::from("sans-serif"),
            size: 12.0,
            weight: FontWeight::NORMAL,
            width: FontWidth::NORMAL,
            style: FontStyle::Normal,
            font: None,
            transform: None,
            superscript: 0,
            graphic: None,
            decoration: Decoration::NONE,
            bidi_embedding: 0,
        }
    }
}

impl TextStyle {
    /// Creates a style for `family` at `size` with every other property at its default.
    pub fn new(family: impl Into<Arc<str>>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    /// The font request described by this style.
    pub fn font(&self) -> FontSpec {
        if let Some(font) = &self.font {
            return font.clone();
        }
        FontSpec {
            family: self.family.clone(),
            weight: self.weight,
            width: self.width,
            style: self.style,
            size: self.size,
            transform: self.transform,
            superscript: self.superscript,
        }
    }

    /// The graphic if one is set, otherwise the font.
    pub fn font_or_graphic(&self) -> FontOrGraphic {
        match &self.graphic {
            Some(graphic) => FontOrGraphic::Graphic(graphic.clone()),
            None => FontOrGraphic::Font(self.font()),
        }
    }

    /// The embedding level if it is in the accepted range.
    pub(crate) fn embedding(&self) -> Option<i8> {
        match self.bidi_embedding {
            0 => None,
            e if (-61..=61).contains(&e) => Some(e),
            _ => None,
        }
    }
}

/// Base direction of a paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

/// Properties of the paragraph as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphStyle {
    /// Base direction; `None` derives it from the first strong character.
    pub run_direction: Option<RunDirection>,
    /// Fraction of the width difference distributed by justification, clamped to `0..=1`.
    pub justification: f32,
    /// Digit substitution applied before layout.
    pub numeric_shaper: Option<NumericShaper>,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            run_direction: None,
            justification: 1.0,
            numeric_shaper: None,
        }
    }
}

impl ParagraphStyle {
    /// Justification ratio clamped to `0..=1`, with NaN treated as full justification.
    pub fn justification_ratio(&self) -> f32 {
        if self.justification.is_nan() {
            1.0
        } else {
            self.justification.clamp(0.0, 1.0)
        }
    }
}

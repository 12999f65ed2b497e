// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::fmt;

use peniko::kurbo::Affine;

/// Visual weight class of a font, on a scale from 1.0 to 1000.0.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100.0);

    /// Weight value of 300.
    pub const LIGHT: Self = Self(300.0);

    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400.0);

    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500.0);

    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600.0);

    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);

    /// Weight value of 900.
    pub const BLACK: Self = Self(900.0);

    /// Creates a new weight value.
    pub fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Parses `normal`, `bold` or a bare number.
    ///
    /// ```
    /// use textlayout::FontWeight;
    ///
    /// assert_eq!(FontWeight::parse(" bold "), Some(FontWeight::BOLD));
    /// assert_eq!(FontWeight::parse("650"), Some(FontWeight::new(650.0)));
    /// assert_eq!(FontWeight::parse("heavy"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "normal" => Some(Self::NORMAL),
            "bold" => Some(Self::BOLD),
            other => other.parse::<f32>().ok().map(Self),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NORMAL {
            f.write_str("normal")
        } else if *self == Self::BOLD {
            f.write_str("bold")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Visual width of a font as a ratio of the normal aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWidth(f32);

impl FontWidth {
    /// Width that is 75% of normal.
    pub const CONDENSED: Self = Self(0.75);

    /// Width that is 100% of normal. This is the default value.
    pub const NORMAL: Self = Self(1.0);

    /// Width that is 125% of normal.
    pub const EXPANDED: Self = Self(1.25);

    /// Creates a new width value with the given ratio.
    pub fn from_ratio(ratio: f32) -> Self {
        Self(ratio)
    }

    /// Returns the width value as a ratio, with `1.0` being normal width.
    pub fn ratio(self) -> f32 {
        self.0
    }
}

impl Default for FontWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Posture of a font.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic, with the conventional slant.
    Italic,
    /// Oblique with an optional angle in degrees, `None` meaning 14 degrees.
    Oblique(Option<f32>),
}

impl FontStyle {
    /// Slope of the posture as run over rise, positive leaning right.
    ///
    /// This is the value reported as the italic angle of runs when the font itself does not
    /// provide one.
    pub fn slant(self) -> f32 {
        match self {
            Self::Normal => 0.0,
            Self::Italic => 0.2,
            Self::Oblique(angle) => angle.unwrap_or(14.0).to_radians().tan(),
        }
    }
}

/// A fully described font request, handed to the [`Shaper`](crate::Shaper).
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name. Resolution of the name to font data belongs to the shaper.
    pub family: Arc<str>,
    /// Font weight.
    pub weight: FontWeight,
    /// Font width.
    pub width: FontWidth,
    /// Font posture.
    pub style: FontStyle,
    /// Size in layout units (pixels per em).
    pub size: f32,
    /// Additional glyph transform, applied around each run's origin.
    pub transform: Option<Affine>,
    /// Superscript (positive) or subscript (negative) steps.
    pub superscript: i8,
}

impl FontSpec {
    /// Creates a regular font request for `family` at `size`.
    pub fn new(family: impl Into<Arc<str>>, size: f32) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::NORMAL,
            width: FontWidth::NORMAL,
            style: FontStyle::Normal,
            size,
            transform: None,
            superscript: 0,
        }
    }

    /// Returns the request with a different weight.
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the request with a different posture.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Baseline shift implied by [`superscript`](Self::superscript): positive values raise the
    /// text, in layout units (y grows downward, so the result is negative for superscripts).
    pub fn superscript_offset(&self) -> f32 {
        -f32::from(self.superscript) * self.size / 3.0
    }
}

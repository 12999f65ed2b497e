// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Digit substitution.

/// A script whose native digits can replace European digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DigitScript {
    /// `0`-`9`, leaves text unchanged.
    European,
    /// Arabic-Indic digits.
    Arabic,
    /// Extended Arabic-Indic digits (Persian, Urdu).
    EasternArabic,
    /// Devanagari digits.
    Devanagari,
    /// Bengali digits.
    Bengali,
    /// Gurmukhi digits.
    Gurmukhi,
    /// Gujarati digits.
    Gujarati,
    /// Oriya digits.
    Oriya,
    /// Tamil digits.
    Tamil,
    /// Telugu digits.
    Telugu,
    /// Kannada digits.
    Kannada,
    /// Malayalam digits.
    Malayalam,
    /// Thai digits.
    Thai,
    /// Lao digits.
    Lao,
    /// Tibetan digits.
    Tibetan,
    /// Myanmar digits.
    Myanmar,
    /// Khmer digits.
    Khmer,
    /// Mongolian digits.
    Mongolian,
}

impl DigitScript {
    /// The character for digit zero in this script.
    pub fn zero(self) -> char {
        match self {
            Self::European => '0',
            Self::Arabic => '\u{0660}',
            Self::EasternArabic => '\u{06F0}',
            Self::Devanagari => '\u{0966}',
            Self::Bengali => '\u{09E6}',
            Self::Gurmukhi => '\u{0A66}',
            Self::Gujarati => '\u{0AE6}',
            Self::Oriya => '\u{0B66}',
            Self::Tamil => '\u{0BE6}',
            Self::Telugu => '\u{0C66}',
            Self::Kannada => '\u{0CE6}',
            Self::Malayalam => '\u{0D66}',
            Self::Thai => '\u{0E50}',
            Self::Lao => '\u{0ED0}',
            Self::Tibetan => '\u{0F20}',
            Self::Myanmar => '\u{1040}',
            Self::Khmer => '\u{17E0}',
            Self::Mongolian => '\u{1810}',
        }
    }
}

/// Replaces European digits with the digits of a script before layout.
///
/// The substitution is applied to a copy of the paragraph; offsets are unchanged because every
/// digit maps to exactly one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NumericShaper {
    script: DigitScript,
}

impl NumericShaper {
    /// Creates a shaper producing digits of `script`.
    pub fn new(script: DigitScript) -> Self {
        Self { script }
    }

    /// The target script.
    pub fn script(self) -> DigitScript {
        self.script
    }

    /// Substitutes digits in place.
    pub fn shape(self, text: &mut [char]) {
        let zero = self.script.zero() as u32;
        for ch in text {
            if ch.is_ascii_digit() {
                let digit = *ch as u32 - '0' as u32;
                if let Some(native) = char::from_u32(zero + digit) {
                    *ch = native;
                }
            }
        }
    }
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distribution of a width change over the sides of glyphs.

use alloc::vec::Vec;

/// Order in which glyph sides take part in justification, lowest value first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JustificationPriority {
    /// Arabic kashida insertion points.
    Kashida = 0,
    /// Whitespace.
    Whitespace = 1,
    /// Between characters, typically ideographs.
    InterCharacter = 2,
    /// Adjusted only when nothing else can absorb the change.
    #[default]
    None = 3,
}

impl JustificationPriority {
    const MAX: u8 = Self::None as u8;

    fn from_pass(pass: u8) -> Option<Self> {
        match pass {
            0 => Some(Self::Kashida),
            1 => Some(Self::Whitespace),
            2 => Some(Self::InterCharacter),
            3 => Some(Self::None),
            _ => None,
        }
    }
}

/// How one glyph may grow or shrink during justification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JustificationInfo {
    /// Share of the change this glyph takes relative to others at the same priority.
    pub weight: f32,
    /// Takes the remainder once every glyph at this priority reached its grow limit.
    pub grow_absorb: bool,
    /// Priority when growing.
    pub grow_priority: JustificationPriority,
    /// Maximum growth on the left side.
    pub grow_left_limit: f32,
    /// Maximum growth on the right side.
    pub grow_right_limit: f32,
    /// Takes the remainder once every glyph at this priority reached its shrink limit.
    pub shrink_absorb: bool,
    /// Priority when shrinking.
    pub shrink_priority: JustificationPriority,
    /// Maximum shrinkage on the left side.
    pub shrink_left_limit: f32,
    /// Maximum shrinkage on the right side.
    pub shrink_right_limit: f32,
}

impl JustificationInfo {
    /// A glyph that never changes.
    pub const NONE: Self = Self {
        weight: 0.0,
        grow_absorb: false,
        grow_priority: JustificationPriority::None,
        grow_left_limit: 0.0,
        grow_right_limit: 0.0,
        shrink_absorb: false,
        shrink_priority: JustificationPriority::None,
        shrink_left_limit: 0.0,
        shrink_right_limit: 0.0,
    };

    /// Whitespace in a font of `size`: grows on the right by up to `size`, shrinks on the right
    /// by up to a quarter of it, absorbing in both directions.
    pub fn whitespace(size: f32) -> Self {
        Self {
            weight: size,
            grow_absorb: true,
            grow_priority: JustificationPriority::Whitespace,
            grow_left_limit: 0.0,
            grow_right_limit: size,
            shrink_absorb: true,
            shrink_priority: JustificationPriority::Whitespace,
            shrink_left_limit: 0.0,
            shrink_right_limit: size / 4.0,
        }
    }

    /// An ideograph in a font of `size`: grows by up to `size` on each side, never shrinks.
    pub fn inter_character(size: f32) -> Self {
        Self {
            weight: size,
            grow_absorb: true,
            grow_priority: JustificationPriority::InterCharacter,
            grow_left_limit: size,
            grow_right_limit: size,
            shrink_absorb: false,
            shrink_priority: JustificationPriority::None,
            shrink_left_limit: 0.0,
            shrink_right_limit: 0.0,
        }
    }

    /// Default record for character `ch` with `advance` in a font of `size`.
    pub fn for_char(ch: char, advance: f32, size: f32) -> Self {
        if advance == 0.0 {
            Self::NONE
        } else if ch.is_whitespace() {
            Self::whitespace(size)
        } else if is_ideographic(ch) {
            Self::inter_character(size)
        } else {
            Self::NONE
        }
    }

    fn priority(&self, grow: bool) -> JustificationPriority {
        if grow {
            self.grow_priority
        } else {
            self.shrink_priority
        }
    }

    fn absorbs(&self, grow: bool) -> bool {
        if grow {
            self.grow_absorb
        } else {
            self.shrink_absorb
        }
    }

    fn left_limit(&self, grow: bool) -> f32 {
        if grow {
            self.grow_left_limit
        } else {
            self.shrink_left_limit
        }
    }

    fn right_limit(&self, grow: bool) -> f32 {
        if grow {
            self.grow_right_limit
        } else {
            self.shrink_right_limit
        }
    }
}

/// CJK unified ideographs and Yi, Hangul syllables (partial), CJK compatibility ideographs.
fn is_ideographic(ch: char) -> bool {
    matches!(ch as u32, 0x4E00..0xA000 | 0xAC00..0xB000 | 0xF900..0xFB00)
}

/// Computes per-side deltas for a visually ordered, contiguous sequence of glyphs.
///
/// The outer side of the first and last glyph never moves. Priorities are visited in order; a
/// priority whose capacity covers the remaining change takes all of it in proportion to weight,
/// otherwise every side takes its limit (plus a weighted share of the remainder when some glyph
/// absorbs) and the next priority continues with what is left. When every priority has been
/// visited, the first priority with any glyphs takes whatever remains, regardless of limits.
#[derive(Clone, Copy, Debug)]
pub struct Justifier<'a> {
    infos: &'a [JustificationInfo],
}

impl<'a> Justifier<'a> {
    /// Creates a justifier over `infos`.
    pub fn new(infos: &'a [JustificationInfo]) -> Self {
        Self { infos }
    }

    /// Returns two deltas per glyph, left side then right side.
    ///
    /// A positive `delta` grows the sequence, a negative one shrinks it.
    pub fn justify(&self, mut delta: f32) -> Vec<f32> {
        let count = self.infos.len();
        let mut deltas = alloc::vec![0.0_f32; count * 2];
        let grow = delta > 0.0;
        let mut fallback: Option<JustificationPriority> = None;
        let mut pass = 0_u8;
        while delta != 0.0 {
            let last_pass = pass > JustificationPriority::MAX;
            let priority = if last_pass {
                fallback
            } else {
                JustificationPriority::from_pass(pass)
            };

            let mut weight = 0.0_f32;
            let mut limit = 0.0_f32;
            let mut absorb_weight = 0.0_f32;
            for (i, info) in self.infos.iter().enumerate() {
                if Some(info.priority(grow)) != priority {
                    continue;
                }
                if fallback.is_none() {
                    fallback = Some(info.priority(grow));
                }
                if i != 0 {
                    weight += info.weight;
                    limit += info.left_limit(grow);
                    if info.absorbs(grow) {
                        absorb_weight += info.weight;
                    }
                }
                if i + 1 != count {
                    weight += info.weight;
                    limit += info.right_limit(grow);
                    if info.absorbs(grow) {
                        absorb_weight += info.weight;
                    }
                }
            }
            if !grow {
                limit = -limit;
            }

            let hit_limit = weight == 0.0 || (!last_pass && ((delta < 0.0) == (delta < limit)));
            let absorbing = hit_limit && absorb_weight > 0.0;
            let weighted_delta = delta / weight;
            let weighted_absorb = if absorbing {
                (delta - limit) / absorb_weight
            } else {
                0.0
            };

            for (i, info) in self.infos.iter().enumerate() {
                if Some(info.priority(grow)) != priority {
                    continue;
                }
                let side = |side_limit: f32| {
                    if hit_limit {
                        let mut d = if grow { side_limit } else { -side_limit };
                        if absorbing && info.absorbs(grow) {
                            d += info.weight * weighted_absorb;
                        }
                        d
                    } else {
                        info.weight * weighted_delta
                    }
                };
                if i != 0 {
                    deltas[i * 2] += side(info.left_limit(grow));
                }
                if i + 1 != count {
                    deltas[i * 2 + 1] += side(info.right_limit(grow));
                }
            }

            tracing::trace!(pass, ?priority, delta, limit, hit_limit, absorbing, "justify pass");
            if last_pass || !hit_limit || absorbing {
                break;
            }
            delta -= limit;
            pass += 1;
        }
        deltas
    }
}

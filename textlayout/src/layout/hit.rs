// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use peniko::kurbo::{Point, Rect};

use super::{CaretPolicy, Layout};
use crate::error::Error;
use crate::shape::RunBaseline;

/// An edge of a character: where a caret can go.
///
/// The insertion index is the character index for a leading edge and one past it for a
/// trailing edge. Character indices range from `-1` to the character count, so that the
/// positions before the first and after the last character can be named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextHit {
    char_index: isize,
    leading: bool,
}

impl TextHit {
    /// The leading edge of the character at `char_index`.
    pub fn leading(char_index: isize) -> Self {
        Self {
            char_index,
            leading: true,
        }
    }

    /// The trailing edge of the character at `char_index`.
    pub fn trailing(char_index: isize) -> Self {
        Self {
            char_index,
            leading: false,
        }
    }

    /// The hit that inserts at `offset` from the character before it.
    pub fn before_offset(offset: isize) -> Self {
        Self::trailing(offset - 1)
    }

    /// The hit that inserts at `offset` from the character after it.
    pub fn after_offset(offset: isize) -> Self {
        Self::leading(offset)
    }

    /// Index of the character hit.
    pub fn char_index(self) -> isize {
        self.char_index
    }

    /// Returns `true` for the leading edge.
    pub fn is_leading_edge(self) -> bool {
        self.leading
    }

    /// Index at which text would be inserted.
    pub fn insertion_index(self) -> isize {
        if self.leading {
            self.char_index
        } else {
            self.char_index + 1
        }
    }

    /// The hit with the same insertion index on the other character.
    pub fn other_hit(self) -> Self {
        if self.leading {
            Self::trailing(self.char_index - 1)
        } else {
            Self::leading(self.char_index + 1)
        }
    }
}

impl fmt::Display for TextHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TextHit[{}{}]",
            self.char_index,
            if self.leading { "L" } else { "T" }
        )
    }
}

/// Tuning of [`Layout::hit_test_char_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTestOptions {
    /// Weight of the squared distance along the baseline relative to the squared distance
    /// across it.
    pub baseline_weight: f32,
}

impl Default for HitTestOptions {
    fn default() -> Self {
        Self {
            baseline_weight: 4.0,
        }
    }
}

impl Layout {
    pub(crate) fn check_hit(&self, hit: TextHit, operation: &'static str) -> Result<(), Error> {
        let count = self.character_count();
        let insertion = hit.insertion_index();
        if insertion < 0 || insertion > count as isize {
            return Err(Error::index_out_of_range(operation, insertion, count));
        }
        Ok(())
    }

    /// Visual caret position, `0..=count`, for a hit.
    pub(crate) fn hit_to_caret(&self, hit: TextHit) -> usize {
        let count = self.character_count();
        let ltr = self.is_left_to_right();
        let Ok(index) = usize::try_from(hit.char_index()) else {
            return if ltr { 0 } else { count };
        };
        if index >= count {
            return if ltr { count } else { 0 };
        }
        let visual = self.line.logical_to_visual(index);
        if hit.is_leading_edge() != self.char_is_ltr(index) {
            visual + 1
        } else {
            visual
        }
    }

    pub(crate) fn caret_to_hit(&self, caret: usize) -> TextHit {
        let count = self.character_count();
        if caret == 0 || caret == count {
            if (caret == count) == self.is_left_to_right() {
                TextHit::leading(count as isize)
            } else {
                TextHit::trailing(-1)
            }
        } else {
            let index = self.line.visual_to_logical(caret);
            if self.char_is_ltr(index) {
                TextHit::leading(index as isize)
            } else {
                TextHit::trailing(index as isize)
            }
        }
    }

    fn caret_is_valid(&self, caret: usize) -> Result<bool, Error> {
        let count = self.character_count();
        if caret == 0 || caret == count {
            return Ok(true);
        }
        let mut index = self.line.visual_to_logical(caret);
        if !self.char_is_ltr(index) {
            index = self.line.visual_to_logical(caret - 1);
            if self.char_is_ltr(index) {
                return Ok(true);
            }
        }
        self.line.caret_at_offset_is_valid(index)
    }

    pub(crate) fn char_is_ltr(&self, index: usize) -> bool {
        self.line.ordering().level(index) & 1 == 0
    }

    /// The hit one caret position to the right of `hit`, `None` at the right end of the line.
    pub fn next_right_hit(&self, hit: TextHit) -> Result<Option<TextHit>, Error> {
        self.check_hit(hit, "next_right_hit")?;
        let mut caret = self.hit_to_caret(hit);
        if caret == self.character_count() {
            return Ok(None);
        }
        loop {
            caret += 1;
            if self.caret_is_valid(caret)? {
                return Ok(Some(self.caret_to_hit(caret)));
            }
        }
    }

    /// The hit one caret position to the left of `hit`, `None` at the left end of the line.
    pub fn next_left_hit(&self, hit: TextHit) -> Result<Option<TextHit>, Error> {
        self.check_hit(hit, "next_left_hit")?;
        let mut caret = self.hit_to_caret(hit);
        if caret == 0 {
            return Ok(None);
        }
        loop {
            caret -= 1;
            if self.caret_is_valid(caret)? {
                return Ok(Some(self.caret_to_hit(caret)));
            }
        }
    }

    fn check_offset(&self, offset: usize, operation: &'static str) -> Result<(), Error> {
        if offset > self.character_count() {
            return Err(Error::index_out_of_range(
                operation,
                offset as isize,
                self.character_count(),
            ));
        }
        Ok(())
    }

    /// Moves the strong caret at insertion `offset` one position to the right.
    pub fn next_right_hit_from_offset(
        &self,
        offset: usize,
        policy: &dyn CaretPolicy,
    ) -> Result<Option<TextHit>, Error> {
        self.check_offset(offset, "next_right_hit")?;
        let hit = TextHit::after_offset(offset as isize);
        let strong = policy.strong_caret(hit, hit.other_hit(), self);
        let Some(next) = self.next_right_hit(strong)? else {
            return Ok(None);
        };
        let other = self.visual_other_hit(next)?;
        Ok(Some(policy.strong_caret(other, next, self)))
    }

    /// Moves the strong caret at insertion `offset` one position to the left.
    pub fn next_left_hit_from_offset(
        &self,
        offset: usize,
        policy: &dyn CaretPolicy,
    ) -> Result<Option<TextHit>, Error> {
        self.check_offset(offset, "next_left_hit")?;
        let hit = TextHit::after_offset(offset as isize);
        let strong = policy.strong_caret(hit, hit.other_hit(), self);
        let Some(next) = self.next_left_hit(strong)? else {
            return Ok(None);
        };
        let other = self.visual_other_hit(next)?;
        Ok(Some(policy.strong_caret(other, next, self)))
    }

    /// The hit on the other side of the caret position of `hit`.
    pub fn visual_other_hit(&self, hit: TextHit) -> Result<TextHit, Error> {
        self.check_hit(hit, "visual_other_hit")?;
        let count = self.character_count();
        let ltr = self.is_left_to_right();
        let index = hit.char_index();
        let (char_index, leading) = if index == -1 || index == count as isize {
            let at_start = ltr == (index == -1);
            let visual = if at_start { 0 } else { count - 1 };
            let char_index = self.line.visual_to_logical(visual);
            let char_ltr = self.char_is_ltr(char_index);
            (
                char_index as isize,
                if at_start { char_ltr } else { !char_ltr },
            )
        } else {
            let logical = index as usize;
            let visual = self.line.logical_to_visual(logical);
            let moved_right = self.char_is_ltr(logical) != hit.is_leading_edge();
            let target = if moved_right {
                Some(visual + 1)
            } else {
                visual.checked_sub(1)
            };
            match target.filter(|&v| v < count) {
                Some(v) => {
                    let char_index = self.line.visual_to_logical(v);
                    (
                        char_index as isize,
                        moved_right == self.char_is_ltr(char_index),
                    )
                }
                None => {
                    let char_index = if moved_right == ltr { count as isize } else { -1 };
                    (char_index, char_index == count as isize)
                }
            }
        };
        Ok(if leading {
            TextHit::leading(char_index)
        } else {
            TextHit::trailing(char_index)
        })
    }

    /// Position of the caret for `hit`: along the baseline, and the offset of the character
    /// from the baseline.
    pub fn hit_to_point(&self, hit: TextHit) -> Result<Point, Error> {
        self.check_hit(hit, "hit_to_point")?;
        let count = self.character_count();
        let index = hit.char_index();
        if index == -1 || index == count as isize {
            let at_start = self.is_left_to_right() == (index == -1);
            let x = if at_start { 0.0 } else { self.advance() };
            return Ok(Point::new(f64::from(x), 0.0));
        }
        let index = index as usize;
        let x = self.line.char_line_position(index, hit.is_leading_edge())?;
        let y = self.line.char_y(index)?;
        Ok(Point::new(f64::from(x), f64::from(y)))
    }

    /// The hit closest to `(x, y)` within the natural bounds.
    pub fn hit_test_char(&self, x: f32, y: f32) -> TextHit {
        self.hit_test_char_with(x, y, self.natural_bounds(), &HitTestOptions::default())
    }

    /// The hit closest to `(x, y)`.
    ///
    /// Points left or right of `bounds` hit the start or end of the line. Otherwise the
    /// character whose center, shifted by its slant, is nearest wins, with distance along the
    /// baseline weighted by `options`; the side of the slanted center line picks the edge.
    pub fn hit_test_char_with(
        &self,
        x: f32,
        y: f32,
        bounds: Rect,
        options: &HitTestOptions,
    ) -> TextHit {
        let count = self.character_count();
        let last = count as isize - 1;
        let ltr = self.is_left_to_right();
        if f64::from(x) < bounds.x0 {
            return if ltr {
                TextHit::leading(0)
            } else {
                TextHit::trailing(last)
            };
        }
        if f64::from(x) >= bounds.x1 {
            return if ltr {
                TextHit::trailing(last)
            } else {
                TextHit::leading(0)
            };
        }

        let metrics = self.line.metrics();
        let offsets = self.line.baseline_offsets();
        let mut distance = f32::MAX;
        let mut index = 0;
        let mut trail: Option<usize> = None;
        let (mut hit_x, mut hit_y, mut hit_angle) = (0.0_f32, 0.0_f32, 0.0_f32);
        let mut start = 0;
        for (run_index, run) in self.line.runs().iter().enumerate() {
            let m = run.metrics();
            let mut center_y = match m.baseline {
                RunBaseline::Top => -(metrics.ascent - m.ascent),
                RunBaseline::Bottom => metrics.descent - m.descent,
                RunBaseline::Text(_) => m.effective_baseline_offset(offsets),
            } + m.ss_offset;
            let dy = (m.descent - m.ascent) / 2.0 - center_y;
            let slant_dx = dy * m.italic_angle;
            center_y += dy;
            let dy_squared = (center_y - y) * (center_y - y);
            let (origin_x, _) = self.line.run_origin(run_index);
            for local in 0..run.char_count() {
                let i = start + local;
                if !run.caret_at_offset_is_valid(local) {
                    continue;
                }
                if trail.is_none() {
                    trail = Some(i);
                }
                let center_x =
                    origin_x + run.char_x(local) + run.char_advance(local) / 2.0 - slant_dx;
                let dx = center_x - x;
                let d = (options.baseline_weight * dx * dx + dy_squared).sqrt();
                if d < distance {
                    distance = d;
                    index = i;
                    trail = None;
                    hit_x = center_x;
                    hit_y = center_y;
                    hit_angle = m.italic_angle;
                }
            }
            start += run.char_count();
        }
        let left = x < hit_x - (y - hit_y) * hit_angle;
        if self.char_is_ltr(index) == left {
            TextHit::leading(index as isize)
        } else {
            TextHit::trailing(trail.unwrap_or(count) as isize - 1)
        }
    }
}

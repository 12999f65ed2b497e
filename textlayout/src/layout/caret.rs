// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{BezPath, Point, Rect};
use smallvec::SmallVec;

use super::{Layout, TextHit};
use crate::error::Error;
use crate::shape::RunBaseline;

/// Chooses the strong caret when an insertion offset maps to two positions.
pub trait CaretPolicy {
    /// Returns whichever of `hit1` and `hit2` is the strong caret in `layout`.
    fn strong_caret(&self, hit1: TextHit, hit2: TextHit, layout: &Layout) -> TextHit;
}

/// The hit on the character with the lower bidi level wins; on a tie the leading edge wins,
/// then `hit1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCaretPolicy;

impl CaretPolicy for DefaultCaretPolicy {
    fn strong_caret(&self, hit1: TextHit, hit2: TextHit, layout: &Layout) -> TextHit {
        let level1 = layout.level_at(hit1.char_index());
        let level2 = layout.level_at(hit2.char_index());
        if level1 == level2 {
            if hit2.is_leading_edge() && !hit1.is_leading_edge() {
                hit2
            } else {
                hit1
            }
        } else if level1 < level2 {
            hit1
        } else {
            hit2
        }
    }
}

/// Geometry of a caret.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretInfo {
    /// Where the caret crosses the baseline.
    pub position: f32,
    /// Horizontal change per unit of height, positive leaning right.
    pub slope: f32,
    /// Top of the caret, from the hit character's own ascent and baseline.
    pub top: Point,
    /// Bottom of the caret, from the hit character's own descent and baseline.
    pub bottom: Point,
}

/// Carets for an insertion offset.
#[derive(Clone, Debug, PartialEq)]
pub struct CaretShapes {
    /// The caret chosen by the policy.
    pub strong: BezPath,
    /// The other caret, when the offset sits at a direction boundary.
    pub weak: Option<BezPath>,
}

impl Layout {
    /// Position along the baseline and slope of the caret at visual position `caret`.
    ///
    /// A caret between two characters averages the trailing edge of the left one and the
    /// leading edge of the right one.
    fn caret_position(&self, caret: usize, bounds: Rect) -> Result<(f32, f32), Error> {
        let line = &self.line;
        let count = self.character_count();
        let slanted = |index: usize, x: f32| -> Result<(f32, f32), Error> {
            let angle = line.char_angle(index)?;
            if angle == 0.0 {
                return Ok((x, x));
            }
            let x = x + angle * line.char_shift(index)?;
            Ok((
                x + angle * line.char_ascent(index)?,
                x - angle * line.char_descent(index)?,
            ))
        };
        let (top, bottom) = if caret == 0 || caret == count {
            let (top, bottom) = if caret == count {
                let index = line.visual_to_logical(count - 1);
                slanted(index, line.char_x(index)? + line.char_advance(index)?)?
            } else {
                let index = line.visual_to_logical(0);
                slanted(index, line.char_x(index)?)?
            };
            (top, bottom)
        } else {
            let left = line.visual_to_logical(caret - 1);
            let (top1, bottom1) = slanted(left, line.char_x(left)? + line.char_advance(left)?)?;
            let right = line.visual_to_logical(caret);
            let (top2, bottom2) = slanted(right, line.char_x(right)?)?;
            ((top1 + top2) / 2.0, (bottom1 + bottom2) / 2.0)
        };
        let height = bounds.height() as f32;
        let slope = if height > 0.0 {
            (top - bottom) / height
        } else {
            0.0
        };
        Ok((top + slope * bounds.y0 as f32, slope))
    }

    /// Points of the caret at visual position `caret` from the top to the bottom of `bounds`.
    ///
    /// A caret leaving a side of `bounds` bends there and runs along that side.
    /// The far end of a caret crossing both sides is clamped to the opposite side.
    pub(crate) fn caret_path(
        &self,
        caret: usize,
        bounds: Rect,
    ) -> Result<SmallVec<[Point; 3]>, Error> {
        let (position, slope) = self.caret_position(caret, bounds)?;
        let (position, slope) = (f64::from(position), f64::from(slope));
        let (top, bottom) = (bounds.y0, bounds.y1);
        let x_at = |y: f64| position - slope * y;
        let (x0, x1) = (x_at(top), x_at(bottom));
        let (left, right) = (bounds.x0, bounds.x1);
        // Endpoints ordered by x.
        let (mut near, mut far) = if x0 <= x1 {
            (Point::new(x0, top), Point::new(x1, bottom))
        } else {
            (Point::new(x1, bottom), Point::new(x0, top))
        };
        let mut kink = None;
        if near.x < left {
            if slope == 0.0 || far.x <= left {
                near.x = left;
                far.x = left;
            } else {
                kink = Some(Point::new(left, (position - left) / slope));
                near.x = left;
                far.x = far.x.min(right);
            }
        } else if far.x > right {
            if slope == 0.0 || near.x >= right {
                near.x = right;
                far.x = right;
            } else {
                kink = Some(Point::new(right, (position - right) / slope));
                far.x = right;
            }
        }
        let (first, last) = if near.y == top {
            (near, far)
        } else {
            (far, near)
        };
        let mut points = SmallVec::new();
        points.push(first);
        points.extend(kink);
        points.push(last);
        Ok(points)
    }

    /// Caret geometry for `hit` within `bounds`.
    pub fn caret_info(&self, hit: TextHit, bounds: Rect) -> Result<CaretInfo, Error> {
        self.check_hit(hit, "caret_info")?;
        let (position, slope) = self.caret_position(self.hit_to_caret(hit), bounds)?;
        let count = self.character_count();
        let metrics = self.line.metrics();
        let index = hit.char_index();
        let (top, bottom) = if index == -1 || index == count as isize {
            let at_start = self.is_left_to_right() == (index == -1);
            let x = if at_start { 0.0 } else { metrics.advance };
            ((x, -metrics.ascent), (x, metrics.descent))
        } else {
            let index = index as usize;
            let m = self.line.char_metrics(index)?;
            let x = self.line.char_line_position(index, hit.is_leading_edge())?;
            match m.baseline {
                RunBaseline::Top => ((x, -metrics.ascent), (x, -metrics.ascent + m.height())),
                RunBaseline::Bottom => ((x, metrics.descent - m.height()), (x, metrics.descent)),
                RunBaseline::Text(baseline) => {
                    let offset = self.line.baseline_offsets()[baseline.index()];
                    let angle = m.italic_angle;
                    let x = x + angle * m.ss_offset;
                    (
                        (x + angle * m.ascent, offset - m.ascent),
                        (x - angle * m.descent, offset + m.descent),
                    )
                }
            }
        };
        let point = |(x, y): (f32, f32)| Point::new(f64::from(x), f64::from(y));
        Ok(CaretInfo {
            position,
            slope,
            top: point(top),
            bottom: point(bottom),
        })
    }

    /// Caret for `hit`, spanning `bounds` vertically.
    pub fn caret_shape(&self, hit: TextHit, bounds: Rect) -> Result<BezPath, Error> {
        self.check_hit(hit, "caret_shape")?;
        let points = self.caret_path(self.hit_to_caret(hit), bounds)?;
        Ok(polyline(&points))
    }

    /// Strong and weak carets for insertion `offset`.
    pub fn caret_shapes(
        &self,
        offset: usize,
        bounds: Rect,
        policy: &dyn CaretPolicy,
    ) -> Result<CaretShapes, Error> {
        if offset > self.character_count() {
            return Err(Error::index_out_of_range(
                "caret_shapes",
                offset as isize,
                self.character_count(),
            ));
        }
        let hit = TextHit::after_offset(offset as isize);
        let other = hit.other_hit();
        let hit_caret = self.hit_to_caret(hit);
        let other_caret = self.hit_to_caret(other);
        let hit_shape = polyline(&self.caret_path(hit_caret, bounds)?);
        if hit_caret == other_caret {
            return Ok(CaretShapes {
                strong: hit_shape,
                weak: None,
            });
        }
        let other_shape = polyline(&self.caret_path(other_caret, bounds)?);
        Ok(if policy.strong_caret(hit, other, self) == hit {
            CaretShapes {
                strong: hit_shape,
                weak: Some(other_shape),
            }
        } else {
            CaretShapes {
                strong: other_shape,
                weak: Some(hit_shape),
            }
        })
    }
}

pub(crate) fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    for (i, &p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

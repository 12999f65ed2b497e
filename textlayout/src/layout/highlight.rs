// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use peniko::kurbo::{BezPath, Point, Rect, Shape};
use smallvec::SmallVec;

use super::{Layout, TextHit};
use crate::error::Error;

type CaretPoints = SmallVec<[Point; 3]>;

impl Layout {
    /// Closed path around two carets, walking the second one backward so the joining
    /// segments never cross.
    fn bounding_shape(first: &[Point], second: &[Point]) -> BezPath {
        let mut path = super::caret::polyline(first);
        let descending = |p: &[Point]| match (p.first(), p.last()) {
            (Some(a), Some(b)) => a.y > b.y,
            _ => false,
        };
        if descending(first) == descending(second) {
            for &p in second.iter().rev() {
                path.line_to(p);
            }
        } else {
            for &p in second {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }

    fn caret_bounding_shape(&self, a: usize, b: usize, bounds: Rect) -> Result<BezPath, Error> {
        let (a, b) = if a > b { (b, a) } else { (a, b) };
        Ok(Self::bounding_shape(
            &self.caret_path(a, bounds)?,
            &self.caret_path(b, bounds)?,
        ))
    }

    /// Region between the left side of `bounds` and the leftmost caret.
    fn left_shape(&self, bounds: Rect) -> Result<BezPath, Error> {
        let side: CaretPoints = [Point::new(bounds.x0, bounds.y1), Point::new(bounds.x0, bounds.y0)]
            .into_iter()
            .collect();
        Ok(Self::bounding_shape(&side, &self.caret_path(0, bounds)?))
    }

    /// Region between the rightmost caret and the right side of `bounds`.
    fn right_shape(&self, bounds: Rect) -> Result<BezPath, Error> {
        let side: CaretPoints = [Point::new(bounds.x1, bounds.y1), Point::new(bounds.x1, bounds.y0)]
            .into_iter()
            .collect();
        Ok(Self::bounding_shape(
            &self.caret_path(self.character_count(), bounds)?,
            &side,
        ))
    }

    fn append_if_not_empty(path: &mut BezPath, shape: BezPath) {
        let b = shape.bounding_box();
        if b.width() > 0.0 && b.height() > 0.0 {
            path.extend(shape.elements().iter().copied());
        }
    }

    /// Highlight of everything visually between the carets of `first` and `second`.
    ///
    /// The region is contiguous on screen. It extends to the side of `bounds` when either hit
    /// is at the corresponding end of the line.
    pub fn visual_highlight_shape(
        &self,
        first: TextHit,
        second: TextHit,
        bounds: Rect,
    ) -> Result<BezPath, Error> {
        self.check_hit(first, "visual_highlight_shape")?;
        self.check_hit(second, "visual_highlight_shape")?;
        let first = self.hit_to_caret(first);
        let second = self.hit_to_caret(second);
        let mut path = self.caret_bounding_shape(first, second, bounds)?;
        if first == 0 || second == 0 {
            Self::append_if_not_empty(&mut path, self.left_shape(bounds)?);
        }
        let count = self.character_count();
        if first == count || second == count {
            Self::append_if_not_empty(&mut path, self.right_shape(bounds)?);
        }
        Ok(path)
    }

    /// Highlight of the characters `start..limit` (in either order).
    ///
    /// Each maximal stretch of one direction gets its own region, so a selection crossing a
    /// direction boundary may show as disjoint regions.
    pub fn logical_highlight_shape(
        &self,
        start: usize,
        limit: usize,
        bounds: Rect,
    ) -> Result<BezPath, Error> {
        let (start, limit) = if start > limit {
            (limit, start)
        } else {
            (start, limit)
        };
        let count = self.character_count();
        if limit > count {
            return Err(Error::invalid_range(
                "logical_highlight_shape",
                start as isize,
                limit as isize,
                count,
            ));
        }
        let mut carets: Vec<(usize, usize)> = Vec::new();
        if start < limit {
            let mut index = start;
            while index < limit {
                let caret_start = self.hit_to_caret(TextHit::leading(index as isize));
                let ltr = self.char_is_ltr(index);
                index += 1;
                while index < limit && self.char_is_ltr(index) == ltr {
                    index += 1;
                }
                let caret_end = self.hit_to_caret(TextHit::trailing(index as isize - 1));
                carets.push((caret_start, caret_end));
            }
        } else {
            let caret = self.hit_to_caret(TextHit::leading(start as isize));
            carets.push((caret, caret));
        }
        let mut path = BezPath::new();
        for (a, b) in carets {
            let shape = self.caret_bounding_shape(a, b, bounds)?;
            path.extend(shape.elements().iter().copied());
        }
        if start != limit {
            let ltr = self.is_left_to_right();
            if (ltr && start == 0) || (!ltr && limit == count) {
                Self::append_if_not_empty(&mut path, self.left_shape(bounds)?);
            }
            if (ltr && limit == count) || (!ltr && start == 0) {
                Self::append_if_not_empty(&mut path, self.right_shape(bounds)?);
            }
        }
        Ok(path)
    }

    /// Logical ranges of the characters visually between the carets of `first` and `second`.
    ///
    /// Ranges are split where the direction changes, so each range is visually contiguous and
    /// of one direction.
    pub fn logical_ranges_for_visual_selection(
        &self,
        first: TextHit,
        second: TextHit,
    ) -> Result<Vec<Range<usize>>, Error> {
        self.check_hit(first, "logical_ranges_for_visual_selection")?;
        self.check_hit(second, "logical_ranges_for_visual_selection")?;
        let count = self.character_count();
        let mut start = self.hit_to_caret(first);
        let mut limit = self.hit_to_caret(second);
        if start > limit {
            core::mem::swap(&mut start, &mut limit);
        }
        let mut included = alloc::vec![false; count];
        for visual in start..limit {
            included[self.line.visual_to_logical(visual)] = true;
        }
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut open: Option<usize> = None;
        for (i, &inside) in included.iter().enumerate() {
            let split = open.is_some()
                && inside
                && i > 0
                && self.char_is_ltr(i) != self.char_is_ltr(i - 1);
            if let Some(range_start) = open {
                if !inside || split {
                    ranges.push(range_start..i);
                    open = None;
                }
            }
            if inside && open.is_none() {
                open = Some(i);
            }
        }
        if let Some(range_start) = open {
            ranges.push(range_start..count);
        }
        Ok(ranges)
    }

    /// Union of the ink bounds of the characters `start..limit` (in either order).
    pub fn black_box_bounds(&self, start: usize, limit: usize) -> Result<BezPath, Error> {
        let (start, limit) = if start > limit {
            (limit, start)
        } else {
            (start, limit)
        };
        let count = self.character_count();
        if limit > count {
            return Err(Error::invalid_range(
                "black_box_bounds",
                start as isize,
                limit as isize,
                count,
            ));
        }
        let mut path = BezPath::new();
        for index in start..limit {
            let rect = self.line.char_bounds(index)?;
            if rect.width() > 0.0 && rect.height() > 0.0 {
                path.extend(rect.path_elements(0.1));
            }
        }
        Ok(path)
    }
}

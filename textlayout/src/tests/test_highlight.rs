// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Shape;

use super::utils::{assert_close, bidi_context, context, styled, ADVANCE};
use crate::{DefaultCaretPolicy, ErrorKind, Layout, ParagraphStyle, RunDirection, TextHit};

/// "ABC" reads right to left; "def" is embedded at level 2 on a right-to-left base.
///
/// Visually: `d e f C B A`.
fn mixed() -> Layout {
    let text = styled("ABCdef").with_paragraph_style(ParagraphStyle {
        run_direction: Some(RunDirection::Rtl),
        ..ParagraphStyle::default()
    });
    Layout::new(&bidi_context(), &text).unwrap()
}

#[test]
fn mixed_levels() {
    let layout = mixed();
    let levels: Vec<u8> = (0..6).map(|i| layout.character_level(i).unwrap()).collect();
    assert_eq!(levels, [1, 1, 1, 2, 2, 2], "resolved levels");
    assert_eq!(layout.line().visual_to_logical(0), 3, "'d' is leftmost");
    assert_eq!(layout.line().visual_to_logical(5), 0, "'A' is rightmost");
}

#[test]
fn whole_line_selection_splits_at_direction_changes() {
    let layout = mixed();
    let ranges = layout
        .logical_ranges_for_visual_selection(TextHit::trailing(-1), TextHit::leading(6))
        .unwrap();
    assert_eq!(ranges, [0..3, 3..6], "one range per direction");
}

#[test]
fn visual_selection_covers_a_visual_stretch() {
    let layout = mixed();
    let ranges = layout
        .logical_ranges_for_visual_selection(TextHit::leading(6), TextHit::trailing(2))
        .unwrap();
    assert_eq!(ranges, [3..6], "the embedded run sits at the left edge");

    let shape = layout
        .visual_highlight_shape(
            TextHit::leading(6),
            TextHit::trailing(2),
            layout.natural_bounds(),
        )
        .unwrap();
    let bbox = shape.bounding_box();
    assert_close(bbox.x0 as f32, 0.0, "highlight start");
    assert_close(bbox.x1 as f32, 3.0 * ADVANCE, "highlight end");
}

#[test]
fn logical_highlight_follows_the_characters() {
    let layout = mixed();
    let bbox = layout
        .logical_highlight_shape(0, 3, layout.natural_bounds())
        .unwrap()
        .bounding_box();
    assert_close(bbox.x0 as f32, 3.0 * ADVANCE, "right-to-left run start");
    assert_close(bbox.x1 as f32, 6.0 * ADVANCE, "right-to-left run end");

    let reversed = layout
        .logical_highlight_shape(3, 0, layout.natural_bounds())
        .unwrap()
        .bounding_box();
    assert_eq!(reversed, bbox, "endpoints in either order");

    let err = layout
        .logical_highlight_shape(0, 9, layout.natural_bounds())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument, "range past the end");
}

#[test]
fn direction_boundary_has_two_carets() {
    let layout = mixed();
    let shapes = layout
        .caret_shapes(3, layout.natural_bounds(), &DefaultCaretPolicy)
        .unwrap();
    assert!(shapes.weak.is_some(), "the offset maps to two positions");
    let strong = shapes.strong.bounding_box();
    assert_close(strong.x0 as f32, 3.0 * ADVANCE, "the lower level wins");

    let plain = Layout::new(&context(), &styled("abc")).unwrap();
    let shapes = plain
        .caret_shapes(1, plain.natural_bounds(), &DefaultCaretPolicy)
        .unwrap();
    assert!(shapes.weak.is_none(), "one caret inside a single direction");
}

#[test]
fn black_box_bounds_cover_ink() {
    let layout = mixed();
    let bbox = layout.black_box_bounds(0, 3).unwrap().bounding_box();
    assert_close(bbox.x0 as f32, 3.0 * ADVANCE, "ink start");
    assert_close(bbox.x1 as f32, 6.0 * ADVANCE, "ink end");
    assert_close(bbox.y0 as f32, -7.0, "ink top");
    assert_close(bbox.y1 as f32, 0.0, "ink bottom");
}

#[test]
fn strong_caret_moves_right() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    let next = layout
        .next_right_hit_from_offset(1, &DefaultCaretPolicy)
        .unwrap();
    assert_eq!(next, Some(TextHit::leading(2)), "one step to the right");
    let none = layout
        .next_right_hit_from_offset(3, &DefaultCaretPolicy)
        .unwrap();
    assert_eq!(none, None, "already at the right edge");
    assert!(
        layout.next_left_hit_from_offset(4, &DefaultCaretPolicy).is_err(),
        "offset past the end"
    );
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{BezPath, PathEl, Point, Rect, Shape};

use super::utils::{assert_close, context, styled, RecordingPainter, ADVANCE};
use crate::{
    DefaultCaretPolicy, Decoration, ErrorKind, FontStyle, Graphic, HitTestOptions, Layout, ParagraphStyle,
    StyledText, TextHit, TextStyle,
};

#[test]
fn empty_paragraph_is_rejected() {
    let err = Layout::new(&context(), &styled("")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument, "empty text has no layout");
}

#[test]
fn single_style_metrics() {
    let layout = Layout::new(&context(), &styled("Hello World")).unwrap();
    assert_eq!(layout.character_count(), 11, "one caret stop per character");
    assert!(layout.is_left_to_right(), "latin text is left to right");
    assert_close(layout.advance(), 11.0 * ADVANCE, "advance");
    assert_close(layout.ascent(), 8.0, "ascent");
    assert_close(layout.descent(), 2.0, "descent");
    assert_close(layout.leading(), 0.0, "leading");
    assert_eq!(layout.line().runs().len(), 1, "a single style shapes as one run");
}

#[test]
fn visible_advance_skips_trailing_spaces() {
    let layout = Layout::new(&context(), &styled("ab  ")).unwrap();
    assert_close(layout.advance(), 4.0 * ADVANCE, "advance keeps the spaces");
    assert_close(layout.visible_advance(), 2.0 * ADVANCE, "visible advance drops them");

    let blank = Layout::new(&context(), &styled("   ")).unwrap();
    assert_close(blank.visible_advance(), 0.0, "nothing visible");
}

#[test]
fn hit_test_round_trip() {
    let layout = Layout::new(&context(), &styled("Hello World")).unwrap();
    for i in 0..layout.character_count() {
        let center = i as f32 * ADVANCE + ADVANCE / 2.0;
        let hit = layout.hit_test_char(center - 1.0, 0.0);
        assert_eq!(hit, TextHit::leading(i as isize), "left of the center of {i}");
        assert_eq!(hit.insertion_index(), i as isize, "insertion before {i}");
        let hit = layout.hit_test_char(center + 1.0, 0.0);
        assert_eq!(hit, TextHit::trailing(i as isize), "right of the center of {i}");
        assert_eq!(hit.insertion_index(), i as isize + 1, "insertion after {i}");
    }
}

#[test]
fn hit_test_outside_bounds_clamps() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    assert_eq!(layout.hit_test_char(-50.0, 0.0), TextHit::leading(0), "before the line");
    assert_eq!(layout.hit_test_char(500.0, 0.0), TextHit::trailing(2), "after the line");
}

#[test]
fn hit_test_weight_is_configurable() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    let options = HitTestOptions {
        baseline_weight: 1.0,
    };
    let hit = layout.hit_test_char_with(8.0, 0.0, layout.natural_bounds(), &options);
    assert_eq!(hit, TextHit::leading(1), "the nearest center still wins");
}

#[test]
fn arrow_keys_visit_every_caret() {
    let layout = Layout::new(&context(), &styled("Hello World")).unwrap();
    let mut hit = TextHit::leading(0);
    let mut visited = vec![hit.insertion_index()];
    while let Some(next) = layout.next_right_hit(hit).unwrap() {
        visited.push(next.insertion_index());
        hit = next;
    }
    assert_eq!(visited, (0..=11).collect::<Vec<_>>(), "every offset once, left to right");

    let mut back = vec![hit.insertion_index()];
    while let Some(next) = layout.next_left_hit(hit).unwrap() {
        back.push(next.insertion_index());
        hit = next;
    }
    assert_eq!(back, (0..=11).rev().collect::<Vec<_>>(), "every offset once, right to left");
}

#[test]
fn carets_skip_combining_marks() {
    // "e" followed by a combining acute accent.
    let layout = Layout::new(&context(), &styled("ae\u{301}b")).unwrap();
    let mut hit = TextHit::leading(0);
    let mut visited = vec![hit.insertion_index()];
    while let Some(next) = layout.next_right_hit(hit).unwrap() {
        visited.push(next.insertion_index());
        hit = next;
    }
    assert_eq!(visited, [0, 1, 3, 4], "no caret between a base and its mark");
}

#[test]
fn out_of_range_hits_fail() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    let err = layout.hit_to_point(TextHit::leading(9)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument, "hit past the end");
    assert!(
        layout.character_level(-1).is_ok() && layout.character_level(3).is_ok(),
        "the positions just outside the line have a level"
    );
    assert!(layout.character_level(4).is_err(), "further out is an error");
}

#[test]
fn hit_to_point_follows_advances() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    let point = layout.hit_to_point(TextHit::trailing(1)).unwrap();
    assert_close(point.x as f32, 2.0 * ADVANCE, "after the second character");
    let point = layout.hit_to_point(TextHit::trailing(-1)).unwrap();
    assert_close(point.x as f32, 0.0, "start of the line");
    let point = layout.hit_to_point(TextHit::leading(3)).unwrap();
    assert_close(point.x as f32, 3.0 * ADVANCE, "end of the line");
}

#[test]
fn visual_other_hit_shares_the_caret() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    assert_eq!(
        layout.visual_other_hit(TextHit::leading(1)).unwrap(),
        TextHit::trailing(0),
        "left neighbor"
    );
    assert_eq!(
        layout.visual_other_hit(TextHit::trailing(2)).unwrap(),
        TextHit::leading(3),
        "end of the line"
    );
}

#[test]
fn caret_shape_spans_bounds() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    let bounds = layout.natural_bounds();
    let caret = layout.caret_shape(TextHit::leading(1), bounds).unwrap();
    let bbox = caret.bounding_box();
    assert_close(bbox.x0 as f32, ADVANCE, "caret x");
    assert_close(bbox.width() as f32, 0.0, "upright caret");
    assert_close(bbox.height() as f32, bounds.height() as f32, "full height");
}

fn italic_abc() -> Layout {
    let style = TextStyle {
        style: FontStyle::Italic,
        ..TextStyle::new("Test", 10.0)
    };
    Layout::new(&context(), &StyledText::new("abc", style)).unwrap()
}

#[test]
fn italic_caret_leans_right() {
    let layout = italic_abc();
    let info = layout
        .caret_info(TextHit::leading(1), layout.natural_bounds())
        .unwrap();
    assert!(info.slope > 0.0, "italic carets slope, got {}", info.slope);
    assert!(info.top.x > info.bottom.x, "the top leans right");
}

fn path_points(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            _ => None,
        })
        .collect()
}

#[track_caller]
fn assert_points(actual: &[Point], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len(), "point count of {actual:?}");
    for (a, &(x, y)) in actual.iter().zip(expected) {
        assert!(
            (a.x - x).abs() < 1e-3 && (a.y - y).abs() < 1e-3,
            "expected ({x}, {y}), got {a:?}"
        );
    }
}

#[test]
fn slanted_caret_bends_at_the_bounds() {
    let layout = italic_abc();
    let natural = layout.natural_bounds();
    // The end caret runs from (19.6, -8) at the top to (17.6, 2) at the bottom.
    let bounds = Rect::new(0.0, natural.y0, 19.1, natural.y1);
    let caret = layout.caret_shape(TextHit::trailing(2), bounds).unwrap();
    let points = path_points(&caret);
    assert_points(&points, &[(19.1, -8.0), (19.1, -5.5), (17.6, 2.0)]);
    for p in &points {
        assert!(
            p.x >= bounds.x0 - 1e-6 && p.x <= bounds.x1 + 1e-6,
            "{p:?} stays inside {bounds:?}"
        );
    }

    let shapes = layout.caret_shapes(3, bounds, &DefaultCaretPolicy).unwrap();
    assert!(shapes.weak.is_none(), "no direction boundary");
    assert_points(&path_points(&shapes.strong), &[(19.1, -8.0), (19.1, -5.5), (17.6, 2.0)]);
}

#[test]
fn caret_crossing_both_sides_keeps_its_slope() {
    let layout = italic_abc();
    let natural = layout.natural_bounds();
    let bounds = Rect::new(18.5, natural.y0, 19.0, natural.y1);
    let caret = layout.caret_shape(TextHit::trailing(2), bounds).unwrap();
    assert_points(
        &path_points(&caret),
        &[(19.0, -8.0), (18.5, -2.5), (18.5, 2.0)],
    );
}

#[test]
fn upright_caret_outside_bounds_is_clamped() {
    let layout = Layout::new(&context(), &styled("abc")).unwrap();
    let natural = layout.natural_bounds();
    let bounds = Rect::new(0.0, natural.y0, 10.0, natural.y1);
    let caret = layout.caret_shape(TextHit::trailing(2), bounds).unwrap();
    assert_points(
        &path_points(&caret),
        &[(10.0, natural.y0), (10.0, natural.y1)],
    );
}

#[test]
fn justification_stretches_spaces() {
    let layout = Layout::new(&context(), &styled("a b c")).unwrap();
    let justified = layout.justified_layout(40.0).unwrap();
    assert!(justified.is_justified(), "marked as justified");
    assert_close(justified.advance(), 40.0, "justified advance");
    assert_close(
        justified.hit_to_point(TextHit::leading(2)).unwrap().x as f32,
        17.0,
        "the first space took half of the change",
    );
    let err = justified.justified_layout(50.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState, "justification is terminal");
}

#[test]
fn zero_ratio_is_a_no_op() {
    let text = styled("a b c").with_paragraph_style(ParagraphStyle {
        justification: 0.0,
        ..ParagraphStyle::default()
    });
    let layout = Layout::new(&context(), &text).unwrap();
    let same = layout.justified_layout(100.0).unwrap();
    assert_eq!(same, layout, "nothing changes");
    assert!(!same.is_justified(), "still justifiable");
}

#[test]
fn justification_rejects_bad_widths() {
    let layout = Layout::new(&context(), &styled("a b")).unwrap();
    for width in [0.0, -1.0, f32::NAN] {
        let err = layout.justified_layout(width).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "width {width}");
    }
}

#[test]
fn graphics_take_part_in_layout() {
    let mut text = styled("a\u{FFFC}b");
    text.set_style(
        1..2,
        TextStyle {
            graphic: Some(Graphic::new(7, 20.0, 15.0, 5.0)),
            ..TextStyle::new("Test", 10.0)
        },
    )
    .unwrap();
    let layout = Layout::new(&context(), &text).unwrap();
    assert_eq!(layout.line().runs().len(), 3, "the graphic is a run of its own");
    assert_close(layout.advance(), 2.0 * ADVANCE + 20.0, "graphic advance");
    assert_close(layout.ascent(), 15.0, "graphic ascent");
    assert_close(layout.descent(), 5.0, "graphic descent");

    let mut painter = RecordingPainter::default();
    layout.draw(&mut painter, 0.0, 0.0);
    assert_eq!(painter.graphics, [(7, ADVANCE, 0.0)], "graphic drawn once");
    assert_eq!(painter.glyphs.len(), 2, "two glyphs");
}

#[test]
fn graphics_only_line_still_justifies() {
    let mut text = styled("\u{FFFC}\u{FFFC}");
    text.set_style(
        0..2,
        TextStyle {
            graphic: Some(Graphic::new(1, 20.0, 8.0, 2.0)),
            ..TextStyle::new("Test", 10.0)
        },
    )
    .unwrap();
    let layout = Layout::new(&context(), &text).unwrap();
    // Graphics grow by at most a third of their advance per side, far less than asked for.
    let justified = layout.justified_layout(100.0).unwrap();
    assert_close(justified.advance(), 100.0, "the remainder is spread past the limits");
    assert_close(
        justified.hit_to_point(TextHit::leading(1)).unwrap().x as f32,
        50.0,
        "both inner sides grew equally",
    );
}

#[test]
fn decorations_are_drawn() {
    let style = TextStyle {
        decoration: Decoration {
            underline: true,
            strikethrough: true,
        },
        ..TextStyle::new("Test", 10.0)
    };
    let layout = Layout::new(&context(), &StyledText::new("ab", style)).unwrap();
    let mut painter = RecordingPainter::default();
    layout.draw(&mut painter, 0.0, 0.0);
    assert_eq!(painter.rects.len(), 2, "underline and strikethrough");
    for rect in &painter.rects {
        assert_close(rect.width() as f32, 2.0 * ADVANCE, "decorations span the run");
    }
}

#[test]
fn outline_covers_ink() {
    let layout = Layout::new(&context(), &styled("a b")).unwrap();
    let bbox = layout.outline(None).bounding_box();
    assert_close(bbox.x0 as f32, 0.0, "outline start");
    assert_close(bbox.x1 as f32, 3.0 * ADVANCE, "outline end");
    assert_close(bbox.y0 as f32, -7.0, "outline top");
    let bounds = layout.bounds();
    assert_close(bounds.x1 as f32, bbox.x1 as f32, "visual bounds match the outline");
    assert_close(bounds.y0 as f32, bbox.y0 as f32, "visual bounds match the outline");
}

#[test]
fn numeric_shaping_runs_first() {
    use crate::{DigitScript, NumericShaper};
    let text = styled("a12").with_paragraph_style(ParagraphStyle {
        numeric_shaper: Some(NumericShaper::new(DigitScript::Thai)),
        ..ParagraphStyle::default()
    });
    let layout = Layout::new(&context(), &text).unwrap();
    assert_eq!(
        layout.line().chars(),
        ['a', '\u{E51}', '\u{E52}'],
        "digits are substituted before layout"
    );
}

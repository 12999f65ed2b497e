// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::{bidi_context, context, styled, TestBidi};
use crate::{
    BidiAnalyzer, BidiOrdering, Layout, ParagraphStyle, RunDirection, StyledText, TextStyle,
    UnicodeBidi,
};

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn assert_inverse(ordering: &BidiOrdering) {
    for i in 0..ordering.len() {
        assert_eq!(
            ordering.visual_to_logical(ordering.logical_to_visual(i)),
            i,
            "visual of logical {i} maps back"
        );
        assert_eq!(
            ordering.logical_to_visual(ordering.visual_to_logical(i)),
            i,
            "logical of visual {i} maps back"
        );
    }
}

#[test]
fn orderings_are_inverse() {
    let text = chars("ab CDE fg HI");
    let ordering = BidiOrdering::analyze(&TestBidi, &text, None, None);
    assert!(!ordering.is_left_to_right(), "upper case reads right to left");
    assert_inverse(&ordering);

    let rtl = BidiOrdering::analyze(&TestBidi, &text, None, Some(RunDirection::Rtl));
    assert!(!rtl.is_base_left_to_right(), "explicit direction wins");
    assert_inverse(&rtl);

    assert_inverse(&BidiOrdering::left_to_right(5));
    assert_inverse(&BidiOrdering::from_levels(6, 1, Some(vec![1, 1, 1, 2, 2, 2])));
}

#[test]
fn base_direction_from_first_strong() {
    let text = chars("ABC def");
    let ordering = BidiOrdering::analyze(&TestBidi, &text, None, None);
    assert_eq!(ordering.base_level(), 1, "starts with a right-to-left letter");
    assert_eq!(ordering.level(0), 1, "right-to-left letters");
    assert_eq!(ordering.level(3), 1, "space between opposite runs takes the base");
    assert_eq!(ordering.level(4), 2, "left-to-right letters inside right-to-left");
    assert_eq!(ordering.visual_to_logical(0), 4, "the embedded run is leftmost");
}

#[test]
fn plain_text_needs_no_tables() {
    let text = chars("plain text");
    assert!(!UnicodeBidi.requires_bidi(&text), "no strong right-to-left characters");
    let ordering = BidiOrdering::analyze(&UnicodeBidi, &text, None, None);
    assert!(ordering.is_left_to_right(), "uniform level 0");
    assert_eq!(ordering.levels(), None, "no level table");
    assert_eq!(ordering.visual_to_logical(3), 3, "identity order");
}

#[test]
fn trailing_whitespace_takes_the_base_level() {
    let text = chars("aBC ");
    let ordering = BidiOrdering::from_levels(4, 0, Some(vec![0, 1, 1, 1]));
    let line = ordering.line(&text, 0..4);
    assert_eq!(line.levels(), Some(&[0, 1, 1, 0][..]), "trailing space reset");
    let part = ordering.line(&text, 1..3);
    assert_eq!(part.levels(), Some(&[1, 1][..]), "no trailing whitespace in range");
}

#[test]
fn explicit_override_reverses_latin() {
    let style = TextStyle {
        bidi_embedding: -1,
        ..TextStyle::new("Test", 10.0)
    };
    let layout = Layout::new(&context(), &StyledText::new("abc", style)).unwrap();
    assert!(layout.is_left_to_right(), "the paragraph stays left to right");
    assert_eq!(layout.character_level(0).unwrap(), 1, "overridden to right to left");
    assert_eq!(layout.line().visual_to_logical(0), 2, "drawn reversed");
}

#[test]
fn run_direction_sets_the_base() {
    let text = styled("abc").with_paragraph_style(ParagraphStyle {
        run_direction: Some(RunDirection::Rtl),
        ..ParagraphStyle::default()
    });
    let layout = Layout::new(&context(), &text).unwrap();
    assert!(!layout.is_left_to_right(), "right-to-left base");
    assert_eq!(layout.character_level(1).unwrap(), 2, "latin inside right to left");
    assert_eq!(layout.character_level(-1).unwrap(), 1, "outside the line is the base");
    assert_eq!(layout.line().visual_to_logical(0), 0, "latin keeps its order");
}

#[test]
fn mixed_line_reorders_runs() {
    let layout = Layout::new(&bidi_context(), &styled("ABC def")).unwrap();
    let line = layout.line();
    assert_eq!(line.runs().len(), 2, "one run per level");
    assert_eq!(line.run_logical_index(0), 1, "the latin run is leftmost");
    assert_eq!(line.run_origin(1).0, 0.0, "latin starts the line");
    assert_eq!(line.run_origin(0).0, 18.0, "hebrew follows");
    assert_eq!(line.visual_to_logical(6), 0, "first letter is rightmost");
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::{bidi_context, context, styled, ADVANCE};
use crate::{IncrementalMeasurer, LayoutContext, StyledText};

/// Asserts that `edited` measures exactly like a measurer built from scratch over `text`.
#[track_caller]
fn assert_matches_fresh(cx: &LayoutContext, edited: &mut IncrementalMeasurer, text: &StyledText) {
    let mut fresh = IncrementalMeasurer::new(cx, text).unwrap();
    assert_eq!(edited.chars(), fresh.chars(), "characters");
    assert_eq!(edited.ordering(), fresh.ordering(), "levels");
    let (start, limit) = (text.start(), text.limit());
    for a in start..limit {
        for b in a + 1..=limit {
            assert_eq!(
                edited.advance_between(a, b).unwrap(),
                fresh.advance_between(a, b).unwrap(),
                "advance of {a}..{b}"
            );
            assert_eq!(
                edited.layout(a, b).unwrap(),
                fresh.layout(a, b).unwrap(),
                "layout of {a}..{b}"
            );
        }
    }
    for width in [1.0, 3.0 * ADVANCE, 7.5 * ADVANCE, 100.0 * ADVANCE] {
        for pos in start..limit {
            assert_eq!(
                edited.line_break_index(pos, width).unwrap(),
                fresh.line_break_index(pos, width).unwrap(),
                "break from {pos} at width {width}"
            );
        }
    }
}

#[test]
fn empty_text_is_rejected() {
    assert!(
        IncrementalMeasurer::new(&context(), &styled("")).is_err(),
        "nothing to measure"
    );
}

#[test]
fn measures_ranges() {
    let mut measurer = IncrementalMeasurer::new(&context(), &styled("hello world")).unwrap();
    assert_eq!(measurer.advance_between(0, 5).unwrap(), 5.0 * ADVANCE, "first word");
    assert_eq!(measurer.advance_between(3, 3).unwrap(), 0.0, "empty range");
    assert_eq!(
        measurer.line_break_index(0, 4.0 * ADVANCE + 1.0).unwrap(),
        4,
        "fifth character overflows"
    );
    assert_eq!(measurer.line_break_index(6, 100.0).unwrap(), 11, "the rest fits");
    let layout = measurer.layout(6, 11).unwrap();
    assert_eq!(layout.line().chars(), ['w', 'o', 'r', 'l', 'd'], "second word");
    assert!(measurer.layout(4, 4).is_err(), "empty layouts are rejected");
    assert!(measurer.advance_between(2, 12).is_err(), "past the end");
    assert!(measurer.line_break_index(11, 10.0).is_err(), "break from the end");
}

#[test]
fn offsets_include_the_start() {
    let text = styled("hello world").with_start(40);
    let mut measurer = IncrementalMeasurer::new(&context(), &text).unwrap();
    assert_eq!(measurer.start(), 40, "start");
    assert_eq!(measurer.limit(), 51, "limit");
    assert_eq!(measurer.line_break_index(40, 4.0 * ADVANCE + 1.0).unwrap(), 44, "absolute");
    assert!(measurer.layout(0, 5).is_err(), "before the paragraph");
}

#[test]
fn insert_matches_a_fresh_measurer() {
    let cx = context();
    let text = styled("hello world again");
    let mut measurer = IncrementalMeasurer::new(&cx, &text).unwrap();
    // Build a window first so the edit has something to invalidate.
    measurer.line_break_index(0, 6.0 * ADVANCE).unwrap();
    measurer.layout(0, 6).unwrap();
    let edited = text.insert_char(5, 'X').unwrap();
    measurer.insert_char(&edited, 5).unwrap();
    assert_matches_fresh(&cx, &mut measurer, &edited);
}

#[test]
fn delete_matches_a_fresh_measurer() {
    let cx = context();
    let text = styled("hello world again");
    let mut measurer = IncrementalMeasurer::new(&cx, &text).unwrap();
    measurer.line_break_index(6, 4.0 * ADVANCE).unwrap();
    let edited = text.delete_char(5).unwrap();
    measurer.delete_char(&edited, 5).unwrap();
    assert_matches_fresh(&cx, &mut measurer, &edited);
}

#[test]
fn right_to_left_insert_matches_a_fresh_measurer() {
    let cx = bidi_context();
    let text = styled("ab CD ef");
    let mut measurer = IncrementalMeasurer::new(&cx, &text).unwrap();
    measurer.layout(0, 8).unwrap();
    let edited = text.insert_char(4, 'Q').unwrap();
    measurer.insert_char(&edited, 4).unwrap();
    assert_matches_fresh(&cx, &mut measurer, &edited);

    let shorter = edited.delete_char(1).unwrap();
    measurer.delete_char(&shorter, 1).unwrap();
    assert_matches_fresh(&cx, &mut measurer, &shorter);
}

#[test]
fn first_right_to_left_character_is_analyzed() {
    let cx = bidi_context();
    let text = styled("abc def");
    let mut measurer = IncrementalMeasurer::new(&cx, &text).unwrap();
    assert!(measurer.ordering().is_left_to_right(), "plain latin");
    let edited = text.insert_char(4, 'Z').unwrap();
    measurer.insert_char(&edited, 4).unwrap();
    assert!(!measurer.ordering().is_left_to_right(), "the new letter is right to left");
    assert_matches_fresh(&cx, &mut measurer, &edited);
}

#[test]
fn styled_insert_matches_a_fresh_measurer() {
    let cx = context();
    let mut text = styled("aaaa bbbb");
    text.set_style(5..9, crate::TextStyle::new("Test", 20.0)).unwrap();
    let mut measurer = IncrementalMeasurer::new(&cx, &text).unwrap();
    let edited = text.insert_char(5, 'c').unwrap();
    measurer.insert_char(&edited, 5).unwrap();
    assert_matches_fresh(&cx, &mut measurer, &edited);
}

#[test]
fn unrelated_text_rebuilds() {
    let cx = context();
    let mut measurer = IncrementalMeasurer::new(&cx, &styled("short")).unwrap();
    let other = styled("a much longer paragraph");
    measurer.insert_char(&other, 0).unwrap();
    assert_matches_fresh(&cx, &mut measurer, &other);
}

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::{context, styled, ADVANCE};
use crate::{BreakOpportunities, ErrorKind, Layout, LineBreaker, StyledText};

fn line_texts(text: &StyledText, width: f32) -> Vec<String> {
    let mut breaker = LineBreaker::new(&context(), text).unwrap();
    let mut lines = Vec::new();
    while let Some(layout) = breaker.next_layout(width).unwrap() {
        lines.push(layout.line().chars().iter().collect());
    }
    lines
}

#[test]
fn breaks_after_whitespace() {
    let text = styled("The quick brown fox");
    let lines = line_texts(&text, 9.0 * ADVANCE + 1.0);
    assert_eq!(lines, ["The quick ", "brown fox"], "two lines");
    let total: usize = lines.iter().map(|l| l.chars().count()).sum();
    assert_eq!(total, 19, "every character on exactly one line");
}

#[test]
fn lines_fit_the_width() {
    let text = styled("one two three four five six seven eight nine ten");
    let width = 12.0 * ADVANCE + 1.0;
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    let mut covered = 0;
    while let Some(layout) = breaker.next_layout(width).unwrap() {
        assert!(
            layout.visible_advance() <= width,
            "line {:?} is too wide",
            layout.line().chars()
        );
        covered += layout.character_count();
    }
    assert_eq!(covered, text.len(), "lines cover the paragraph");
    assert_eq!(breaker.position(), text.limit(), "at the end");
    assert!(breaker.next_layout(width).unwrap().is_none(), "nothing left");
}

#[test]
fn next_offset_does_not_move() {
    let text = styled("The quick brown fox");
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    let width = 9.0 * ADVANCE + 1.0;
    assert_eq!(breaker.next_offset(width).unwrap(), 10, "after the space");
    assert_eq!(breaker.next_offset(width).unwrap(), 10, "same answer twice");
    assert_eq!(breaker.position(), 0, "position unchanged");
    assert_eq!(
        breaker.next_offset_with(width, 4, false).unwrap(),
        4,
        "clamped to the offset limit"
    );
}

#[test]
fn long_word_breaks_inside_unless_required_whole() {
    let text = styled("Supercalifragilistic is");
    let width = 5.0 * ADVANCE + 1.0;
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    let none = breaker.next_layout_with(width, text.limit(), true).unwrap();
    assert!(none.is_none(), "the word does not fit");
    assert_eq!(breaker.position(), 0, "nothing consumed");

    let layout = breaker.next_layout(width).unwrap().unwrap();
    assert_eq!(layout.character_count(), 5, "broken at the width");
    assert_eq!(breaker.position(), 5, "advanced past the line");
}

#[test]
fn progress_is_guaranteed() {
    let text = styled("abc");
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    let layout = breaker.next_layout(1.0).unwrap().unwrap();
    assert_eq!(layout.character_count(), 1, "at least one character per line");
}

#[test]
fn bad_positions_fail() {
    let text = styled("abc def");
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    let err = breaker.next_offset_with(100.0, 0, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument, "limit at the position");
    let err = breaker.set_position(8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument, "past the end");
    breaker.set_position(4).unwrap();
    assert_eq!(breaker.next_offset(100.0).unwrap(), 7, "the rest fits");
    assert!(
        LineBreaker::new(&context(), &styled("")).is_err(),
        "empty paragraphs have no lines"
    );
}

#[test]
fn offsets_start_at_the_paragraph_start() {
    let text = styled("The quick brown fox").with_start(100);
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    assert_eq!(breaker.position(), 100, "starts at the paragraph start");
    let width = 9.0 * ADVANCE + 1.0;
    let first = breaker.next_layout(width).unwrap().unwrap();
    assert_eq!(first.character_count(), 10, "same first line");
    assert_eq!(breaker.position(), 110, "offsets shifted");
    assert!(breaker.set_position(99).is_err(), "before the paragraph");
}

#[test]
fn edits_rewind_to_the_start() {
    let text = styled("The quick brown fox");
    let mut breaker = LineBreaker::new(&context(), &text).unwrap();
    let width = 9.0 * ADVANCE + 1.0;
    breaker.next_layout(width).unwrap();
    let edited = text.insert_char(3, 'y').unwrap();
    breaker.insert_char(&edited, 3).unwrap();
    assert_eq!(breaker.position(), 0, "rewound");
    let first = breaker.next_layout(width).unwrap().unwrap();
    assert_eq!(
        first.line().chars().iter().collect::<String>(),
        "Theyquick ",
        "the edit is visible"
    );

    let shorter = edited.delete_char(3).unwrap();
    breaker.delete_char(&shorter, 3).unwrap();
    assert_eq!(breaker.next_offset(width).unwrap(), 10, "back to the original");
}

/// Allows a line to end after any character.
#[derive(Debug, Default)]
struct Anywhere {
    len: usize,
}

impl BreakOpportunities for Anywhere {
    fn set_text(&mut self, text: &[char]) {
        self.len = text.len();
    }

    fn following(&self, offset: usize) -> Option<usize> {
        (offset < self.len).then_some(offset + 1)
    }

    fn preceding(&self, offset: usize) -> Option<usize> {
        offset.checked_sub(1)
    }

    fn is_boundary(&self, offset: usize) -> bool {
        offset <= self.len
    }
}

#[test]
fn custom_break_opportunities() {
    let text = styled("The quick");
    let width = 5.0 * ADVANCE + 1.0;
    let mut uax = LineBreaker::new(&context(), &text).unwrap();
    assert_eq!(uax.next_offset(width).unwrap(), 4, "word boundary");

    let cx = context().with_line_breaks(|| Box::new(Anywhere::default()));
    let mut anywhere = LineBreaker::new(&cx, &text).unwrap();
    assert_eq!(anywhere.next_offset(width).unwrap(), 5, "any character");
    let layout: Layout = anywhere.next_layout(width).unwrap().unwrap();
    assert_eq!(layout.character_count(), 5, "broken mid-word");
}

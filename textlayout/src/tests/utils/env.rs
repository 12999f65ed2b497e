// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{TestBidi, TestShaper};
use crate::{LayoutContext, StyledText, TextStyle};

/// Font size used throughout the tests.
pub(crate) const SIZE: f32 = 10.0;

/// Advance of every non-mark character at [`SIZE`].
pub(crate) const ADVANCE: f32 = 6.0;

pub(crate) fn context() -> LayoutContext {
    LayoutContext::new(TestShaper)
}

/// A context whose bidi analyzer treats upper-case letters as right-to-left.
pub(crate) fn bidi_context() -> LayoutContext {
    context().with_bidi(TestBidi)
}

pub(crate) fn styled(text: &str) -> StyledText {
    StyledText::new(text, TextStyle::new("Test", SIZE))
}

#[track_caller]
pub(crate) fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "{what}: expected {expected}, got {actual}"
    );
}

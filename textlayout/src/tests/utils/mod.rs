// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod painter;
mod shaper;

pub(crate) use env::{assert_close, bidi_context, context, styled, ADVANCE, SIZE};
pub(crate) use painter::RecordingPainter;
pub(crate) use shaper::{TestBidi, TestShaper};

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::bidi::{BidiAnalyzer, UnicodeBidi};
use crate::line_break::{BreakOpportunities, UaxLineBreaks};
use crate::shape::Shaper;

type BreakFactory = dyn Fn() -> Box<dyn BreakOpportunities> + Send + Sync;

/// Shared collaborators for building layouts.
///
/// This type is cheap to clone and can be reused for any number of layouts.
#[derive(Clone)]
pub struct LayoutContext {
    shaper: Arc<dyn Shaper>,
    bidi: Arc<dyn BidiAnalyzer>,
    line_breaks: Arc<BreakFactory>,
}

impl LayoutContext {
    /// Creates a context around `shaper`, with the bundled bidi analyzer and line break
    /// iterator.
    pub fn new(shaper: impl Shaper + 'static) -> Self {
        Self::from_shared(Arc::new(shaper))
    }

    /// Creates a context around an already shared shaper.
    pub fn from_shared(shaper: Arc<dyn Shaper>) -> Self {
        Self {
            shaper,
            bidi: Arc::new(UnicodeBidi),
            line_breaks: Arc::new(|| Box::new(UaxLineBreaks::new()) as Box<dyn BreakOpportunities>),
        }
    }

    /// Replaces the bidi analyzer.
    pub fn with_bidi(mut self, bidi: impl BidiAnalyzer + 'static) -> Self {
        self.bidi = Arc::new(bidi);
        self
    }

    /// Replaces the factory of line break iterators.
    pub fn with_line_breaks(
        mut self,
        factory: impl Fn() -> Box<dyn BreakOpportunities> + Send + Sync + 'static,
    ) -> Self {
        self.line_breaks = Arc::new(factory);
        self
    }

    /// The shaping collaborator.
    pub fn shaper(&self) -> &dyn Shaper {
        &*self.shaper
    }

    pub(crate) fn shared_shaper(&self) -> Arc<dyn Shaper> {
        self.shaper.clone()
    }

    /// The bidi collaborator.
    pub fn bidi(&self) -> &dyn BidiAnalyzer {
        &*self.bidi
    }

    /// Creates a fresh line break iterator.
    pub fn line_breaks(&self) -> Box<dyn BreakOpportunities> {
        (self.line_breaks)()
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("shaper", &self.shaper)
            .field("bidi", &self.bidi)
            .finish_non_exhaustive()
    }
}

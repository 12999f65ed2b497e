// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error type for layout operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the operation that failed and, where relevant,
/// the offending index or range and the length it was checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// Name of the operation that rejected its input.
    operation: &'static str,

    /// Start of the offending index range (equal to `end` for single indices).
    start: isize,

    /// End of the offending index range.
    end: isize,

    /// The valid length at the time of failure.
    len: usize,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports context for the failure; an `is_empty` method would be meaningless."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The start of the index range provided by the caller.
    pub fn start(&self) -> isize {
        self.start
    }

    /// The end of the index range provided by the caller.
    pub fn end(&self) -> isize {
        self.end
    }

    /// The valid length the caller's input was checked against.
    pub fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn index_out_of_range(operation: &'static str, index: isize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            operation,
            start: index,
            end: index,
            len,
        }
    }

    pub(crate) fn invalid_range(
        operation: &'static str,
        start: isize,
        end: isize,
        len: usize,
    ) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            operation,
            start,
            end,
            len,
        }
    }

    pub(crate) fn invalid_argument(operation: &'static str) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            operation,
            start: 0,
            end: 0,
            len: 0,
        }
    }

    pub(crate) fn already_justified() -> Self {
        Self {
            kind: ErrorKind::InvalidState,
            operation: "justified_layout",
            start: 0,
            end: 0,
            len: 0,
        }
    }

    pub(crate) fn char_count_mismatch(
        operation: &'static str,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self {
            kind: ErrorKind::InternalConsistency,
            operation,
            start: 0,
            end: actual as isize,
            len: expected,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidArgument => {
                if self.start != self.end {
                    write!(
                        f,
                        "{}: range {}..{} is invalid for length {}",
                        self.operation, self.start, self.end, self.len
                    )
                } else if self.len != 0 || self.start != 0 {
                    write!(
                        f,
                        "{}: index {} is out of range for length {}",
                        self.operation, self.start, self.len
                    )
                } else {
                    write!(f, "{}: invalid argument", self.operation)
                }
            }
            ErrorKind::InvalidState => {
                write!(f, "{}: layout has already been justified", self.operation)
            }
            ErrorKind::InternalConsistency => write!(
                f,
                "{}: shaped runs cover {} characters, expected {}",
                self.operation, self.end, self.len
            ),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The caller supplied bad input: an index or hit out of range, an empty paragraph, a
    /// non-increasing range or a non-positive width.
    InvalidArgument,

    /// The call violates the usage protocol of the receiver, such as justifying a layout that
    /// is the result of justification.
    InvalidState,

    /// A collaborator broke its contract, for example a shaper returning runs that do not cover
    /// exactly the characters it was asked to shape.
    InternalConsistency,
}

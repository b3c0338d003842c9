// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for patchreel-diff

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of structural problem found while scanning a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseErrorKind {
    /// A `Date:` line that does not follow the git date format
    #[error("malformed date")]
    MalformedDate,
    /// An `@@` line that is not a valid unified-diff hunk header
    #[error("malformed hunk header")]
    MalformedHunkHeader,
    /// A structural line appeared before its required predecessor
    #[error("unexpected line")]
    UnexpectedState,
}

/// Error raised when a log cannot be scanned
///
/// Carries the offending line (0-based index and raw text) so callers can
/// point at the exact place in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {}: {raw_line:?}", .line_index + 1)]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// 0-based index of the offending line
    pub line_index: usize,
    /// The offending line, verbatim
    pub raw_line: String,
}

impl ParseError {
    /// Create an error for the given line
    #[must_use]
    pub fn new(kind: ParseErrorKind, line_index: usize, raw_line: impl Into<String>) -> Self {
        Self {
            kind,
            line_index,
            raw_line: raw_line.into(),
        }
    }
}

// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Entry points producing the coalesced commit model

use std::iter::FusedIterator;

use crate::coalesce::coalesce_commit;
use crate::error::ParseError;
use crate::model::{Commit, FileRegistry};
use crate::scanner::Scanner;

/// Lazy producer of coalesced commits
///
/// Wraps a [`Scanner`] and coalesces every commit before yielding it. Use
/// [`Iterator::take`] to stop after the first commits of a long log.
#[derive(Debug)]
pub struct CommitStream<I> {
    scanner: Scanner<I>,
}

impl<I> CommitStream<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a stream over the given lines
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            scanner: Scanner::new(lines),
        }
    }

    /// Files seen so far
    #[must_use]
    pub fn registry(&self) -> &FileRegistry {
        self.scanner.registry()
    }
}

impl<I> Iterator for CommitStream<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Commit, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next().map(|result| {
            result.map(|mut commit| {
                coalesce_commit(&mut commit);
                commit
            })
        })
    }
}

impl<I> FusedIterator for CommitStream<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
}

/// Parse a full patch-annotated log into coalesced commits
///
/// # Errors
///
/// Returns the first [`ParseError`] found; no commits are returned in that
/// case.
pub fn parse_commits<L>(lines: L) -> Result<Vec<Commit>, ParseError>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    CommitStream::new(lines).collect()
}

/// Parse a full patch-annotated log without coalescing the changes
///
/// # Errors
///
/// Returns the first [`ParseError`] found; no commits are returned in that
/// case.
pub fn scan_commits<L>(lines: L) -> Result<Vec<Commit>, ParseError>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    Scanner::new(lines).collect()
}

// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Patch-annotated log scanning
//!
//! This module turns the text printed by `git log -p` into raw [`Commit`]s.
//! Lines are interpreted one at a time, so a log can be scanned without
//! holding all of it in memory:
//!
//! - [`LineScanner`] is the state machine, fed with [`LineScanner::process_line`]
//! - [`Scanner`] drives a `LineScanner` over any iterator of lines and yields
//!   each commit as soon as the next `commit` line (or the end of input) is seen
//!
//! The changes produced here are raw bursts; see [`crate::coalesce`] for the
//! pass that refines them.
//!
//! # Example
//!
//! ```
//! use patchreel_diff::scanner::Scanner;
//!
//! let log = "commit abc123\nAuthor: A <a@x.com>\n\n    Add greeting\n\
//!            +++ b/hello.txt\n@@ -0,0 +1,1 @@\n+hello";
//! let commits: Vec<_> = Scanner::new(log.lines()).collect::<Result<_, _>>().unwrap();
//! assert_eq!(commits[0].files[0].filename(), "hello.txt");
//! ```

use std::iter::FusedIterator;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{ParseError, ParseErrorKind};
use crate::model::{Addition, Change, Commit, Deletion, FileCommit, FileRegistry};

/// Format of the `Date:` header printed by `git log`
///
/// For example `Mon Nov 14 13:45:44 2022 +0100`.
pub const GIT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("Invalid hunk header regex")
});

/// Parse the value of a `Date:` header
///
/// Surrounding whitespace is ignored.
#[must_use]
pub fn parse_git_date(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(text.trim(), GIT_DATE_FORMAT).ok()
}

/// A parsed `@@ -a,b +c,d @@` hunk header
///
/// A range without a length (`@@ -3 +3 @@`) has a length of one, as in
/// unified diff output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    /// First line of the hunk in the old file (1-based)
    pub old_start: usize,
    /// Number of old lines in the hunk
    pub old_len: usize,
    /// First line of the hunk in the new file (1-based)
    pub new_start: usize,
    /// Number of new lines in the hunk
    pub new_len: usize,
}

impl HunkHeader {
    /// Parse a hunk header line
    ///
    /// Anything after the closing `@@` (usually a section heading) is ignored.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let caps = HUNK_HEADER.captures(line)?;
        let number = |i: usize| -> Option<usize> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(1),
            }
        };
        Some(Self {
            old_start: number(1)?,
            old_len: number(2)?,
            new_start: number(3)?,
            new_len: number(4)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BurstKind {
    Addition,
    Deletion,
}

/// Line-at-a-time state machine for patch-annotated logs
///
/// Feed every line with [`process_line`](Self::process_line); a commit is
/// handed back once the line starting the next one arrives. Call
/// [`finish`](Self::finish) after the last line to get the final commit.
#[derive(Debug, Default)]
pub struct LineScanner {
    registry: FileRegistry,
    commit: Option<Commit>,
    /// Next target line number in the current hunk (1-based), if in a hunk
    counter: Option<usize>,
    /// Kind of the last change of the current file, while its burst continues
    burst: Option<BurstKind>,
    line_index: usize,
}

impl LineScanner {
    /// Create a scanner with an empty file registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files seen so far
    #[must_use]
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Number of lines processed so far
    #[must_use]
    pub fn lines_processed(&self) -> usize {
        self.line_index
    }

    /// Process a single line of the log
    ///
    /// Returns the previous commit when `line` starts a new one.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for a malformed `Date:` or `@@` line, or for a
    /// line that needs a predecessor that has not been seen (a file header
    /// outside a commit, a `+`/`-` line outside a hunk).
    pub fn process_line(&mut self, line: &str) -> Result<Option<Commit>, ParseError> {
        let index = self.line_index;
        self.line_index += 1;
        let error = |kind| ParseError::new(kind, index, line);

        if let Some(rest) = line.strip_prefix("commit ") {
            let hash = rest.split_whitespace().next().unwrap_or_default();
            debug!(hash, line = index, "New commit");
            self.counter = None;
            self.burst = None;
            return Ok(self.commit.replace(Commit::new(hash)));
        }

        if let Some(rest) = line.strip_prefix("Author:") {
            let commit = self
                .commit
                .as_mut()
                .ok_or_else(|| error(ParseErrorKind::UnexpectedState))?;
            commit.author = rest.trim().to_string();
            return Ok(None);
        }

        if let Some(rest) = line.strip_prefix("Date:") {
            let commit = self
                .commit
                .as_mut()
                .ok_or_else(|| error(ParseErrorKind::UnexpectedState))?;
            let timestamp =
                parse_git_date(rest).ok_or_else(|| error(ParseErrorKind::MalformedDate))?;
            commit.timestamp = Some(timestamp);
            return Ok(None);
        }

        if line.starts_with("diff --git") || line.starts_with("index ") || line.starts_with("--- ")
        {
            return Ok(None);
        }

        if let Some(rest) = line.strip_prefix("+++ ") {
            let commit = self
                .commit
                .as_mut()
                .ok_or_else(|| error(ParseErrorKind::UnexpectedState))?;
            let filename = rest.strip_prefix("b/").unwrap_or(rest);
            let (file, created) = self.registry.resolve(filename);
            if created {
                debug!(file = filename, "New file");
            } else {
                debug!(file = filename, "Existing file");
            }
            commit.files.push(FileCommit::new(file));
            self.counter = None;
            self.burst = None;
            return Ok(None);
        }

        if let Some(text) = line.strip_prefix("    ") {
            let commit = self
                .commit
                .as_mut()
                .ok_or_else(|| error(ParseErrorKind::UnexpectedState))?;
            if commit.files.is_empty() {
                commit.message = text.to_string();
                commit.message_lines.push(text.to_string());
                return Ok(None);
            }
        }

        if line.starts_with("@@ ") {
            let header =
                HunkHeader::parse(line).ok_or_else(|| error(ParseErrorKind::MalformedHunkHeader))?;
            trace!(new_start = header.new_start, "Hunk");
            self.counter = Some(header.new_start);
            self.burst = None;
            return Ok(None);
        }

        if let Some(text) = line.strip_prefix('+') {
            self.push_line(BurstKind::Addition, text)
                .ok_or_else(|| error(ParseErrorKind::UnexpectedState))?;
            return Ok(None);
        }

        if let Some(text) = line.strip_prefix('-') {
            self.push_line(BurstKind::Deletion, text)
                .ok_or_else(|| error(ParseErrorKind::UnexpectedState))?;
            return Ok(None);
        }

        if line.starts_with(' ') {
            if let Some(counter) = self.counter.as_mut() {
                *counter = counter.saturating_add(1);
            }
            self.burst = None;
        }

        Ok(None)
    }

    /// Add one `+` or `-` line to the current file
    ///
    /// Returns `None` when there is no file or hunk to add it to.
    fn push_line(&mut self, kind: BurstKind, text: &str) -> Option<()> {
        let file_commit = self.commit.as_mut()?.files.last_mut()?;
        let counter = self.counter?;

        let extended = self.burst == Some(kind)
            && match (kind, file_commit.changes.last_mut()) {
                (BurstKind::Addition, Some(Change::Addition(a))) => {
                    a.lines.push(text.to_string());
                    true
                }
                (BurstKind::Deletion, Some(Change::Deletion(d))) => {
                    d.lines.push(text.to_string());
                    true
                }
                _ => false,
            };

        if !extended {
            let first_line_number = counter.saturating_sub(1);
            let lines = vec![text.to_string()];
            let change = match kind {
                BurstKind::Addition => Change::Addition(Addition {
                    first_line_number,
                    lines,
                }),
                BurstKind::Deletion => Change::Deletion(Deletion {
                    first_line_number,
                    lines,
                }),
            };
            trace!(kind = change.kind(), line = first_line_number, "New burst");
            file_commit.changes.push(change);
            self.burst = Some(kind);
        }

        if kind == BurstKind::Addition {
            self.counter = Some(counter.saturating_add(1));
        }
        Some(())
    }

    /// Hand back the commit still being built, if any
    pub fn finish(&mut self) -> Option<Commit> {
        self.counter = None;
        self.burst = None;
        self.commit.take()
    }
}

/// Lazy scanner over a sequence of lines
///
/// Yields raw (uncoalesced) commits in input order. Stops after the first
/// error. Taking only the first `k` items never reads lines beyond the start
/// of commit `k + 1`.
#[derive(Debug)]
pub struct Scanner<I> {
    lines: I,
    state: LineScanner,
    done: bool,
}

impl<I> Scanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a scanner over the given lines
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            lines: lines.into_iter(),
            state: LineScanner::new(),
            done: false,
        }
    }

    /// Files seen so far
    #[must_use]
    pub fn registry(&self) -> &FileRegistry {
        self.state.registry()
    }
}

impl<I> Iterator for Scanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Commit, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for line in self.lines.by_ref() {
            match self.state.process_line(line.as_ref()) {
                Ok(Some(commit)) => return Some(Ok(commit)),
                Ok(None) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.done = true;
        self.state.finish().map(Ok)
    }
}

impl<I> FusedIterator for Scanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
}

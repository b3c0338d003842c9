//! Commit, file and change types produced by the scanner

use std::collections::HashMap;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A file as seen across the whole history of one parse run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeFile {
    /// Path of the file, without the `b/` prefix
    pub filename: String,
}

/// Registry of every file seen during one parse run
///
/// The same filename always resolves to the same shared [`CodeFile`], so a
/// consumer can use [`Arc::ptr_eq`] to follow a file through history.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: HashMap<String, Arc<CodeFile>>,
}

impl FileRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a file by name, creating it on first sight
    ///
    /// Returns the shared file and whether it was newly created.
    pub fn resolve(&mut self, filename: &str) -> (Arc<CodeFile>, bool) {
        if let Some(file) = self.files.get(filename) {
            return (Arc::clone(file), false);
        }
        let file = Arc::new(CodeFile {
            filename: filename.to_string(),
        });
        self.files.insert(filename.to_string(), Arc::clone(&file));
        (file, true)
    }

    /// Get a previously registered file
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&Arc<CodeFile>> {
        self.files.get(filename)
    }

    /// Number of distinct files seen so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no file has been seen yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A block of lines inserted at one position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addition {
    /// 0-based position of the first inserted line in the target numbering
    pub first_line_number: usize,
    /// Inserted lines, in order
    pub lines: Vec<String>,
}

/// A block of lines removed at one position
///
/// `first_line_number` is measured in the target numbering of the hunk, which
/// does not advance for removed lines. It is not the line number in the
/// original file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    /// 0-based position of the removed block in the target numbering
    pub first_line_number: usize,
    /// Removed lines, in order
    pub lines: Vec<String>,
}

/// One line rewritten in place
///
/// `common_start + deleted + common_end` is the old line and
/// `common_start + added + common_end` is the new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLine {
    /// Text shared at the start of both lines
    pub common_start: String,
    /// Text only in the old line
    pub deleted: String,
    /// Text only in the new line
    pub added: String,
    /// Text shared at the end of both lines
    pub common_end: String,
}

impl EditLine {
    /// Reconstruct the line before the edit
    #[must_use]
    pub fn old_line(&self) -> String {
        format!("{}{}{}", self.common_start, self.deleted, self.common_end)
    }

    /// Reconstruct the line after the edit
    #[must_use]
    pub fn new_line(&self) -> String {
        format!("{}{}{}", self.common_start, self.added, self.common_end)
    }
}

/// Lines rewritten in place, one [`EditLine`] per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// 0-based position of the first edited line in the target numbering
    pub first_line_number: usize,
    /// Edited lines, in order
    pub lines: Vec<EditLine>,
}

/// A line-level operation on one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Change {
    /// Lines inserted
    Addition(Addition),
    /// Lines removed
    Deletion(Deletion),
    /// Lines rewritten in place
    Edit(Edit),
}

impl Change {
    /// Position of the first affected line in the target numbering
    #[must_use]
    pub fn first_line_number(&self) -> usize {
        match self {
            Self::Addition(a) => a.first_line_number,
            Self::Deletion(d) => d.first_line_number,
            Self::Edit(e) => e.first_line_number,
        }
    }

    /// Number of lines this change covers
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Addition(a) => a.lines.len(),
            Self::Deletion(d) => d.lines.len(),
            Self::Edit(e) => e.lines.len(),
        }
    }

    /// Short lowercase name of the variant
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Addition(_) => "addition",
            Self::Deletion(_) => "deletion",
            Self::Edit(_) => "edit",
        }
    }
}

/// Line counts over a set of changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStats {
    /// Lines added
    pub insertions: usize,
    /// Lines removed
    pub deletions: usize,
    /// Lines edited in place
    pub edits: usize,
}

impl ChangeStats {
    /// Count the lines of a sequence of changes
    #[must_use]
    pub fn from_changes<'a>(changes: impl IntoIterator<Item = &'a Change>) -> Self {
        let mut stats = Self::default();
        for change in changes {
            match change {
                Change::Addition(a) => stats.insertions += a.lines.len(),
                Change::Deletion(d) => stats.deletions += d.lines.len(),
                Change::Edit(e) => stats.edits += e.lines.len(),
            }
        }
        stats
    }

    /// Check if nothing was changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0 && self.edits == 0
    }
}

impl Add for ChangeStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            insertions: self.insertions + rhs.insertions,
            deletions: self.deletions + rhs.deletions,
            edits: self.edits + rhs.edits,
        }
    }
}

impl AddAssign for ChangeStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// The changes made to one file within one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommit {
    /// The file that was changed
    pub file: Arc<CodeFile>,
    /// Changes in ascending `first_line_number` order
    pub changes: Vec<Change>,
}

impl FileCommit {
    /// Create a file commit with no changes yet
    #[must_use]
    pub fn new(file: Arc<CodeFile>) -> Self {
        Self {
            file,
            changes: Vec::new(),
        }
    }

    /// Name of the changed file
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.file.filename
    }

    /// Line counts of this file's changes
    #[must_use]
    pub fn stats(&self) -> ChangeStats {
        ChangeStats::from_changes(&self.changes)
    }

    /// Check that changes never move backwards in the target numbering
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.changes
            .windows(2)
            .all(|w| w[0].first_line_number() <= w[1].first_line_number())
    }
}

/// One commit of the log, with the files it touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash as printed in the log
    pub hash: String,
    /// Author, usually `Name <email>`
    pub author: String,
    /// Author date, if the log carried one
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// The last indented message line before the first file section
    pub message: String,
    /// Every indented message line before the first file section
    pub message_lines: Vec<String>,
    /// Files touched, in log order
    pub files: Vec<FileCommit>,
}

impl Commit {
    /// Create an empty commit for the given hash
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            author: String::new(),
            timestamp: None,
            message: String::new(),
            message_lines: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(7) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }

    /// Get the first line of the commit message
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message_lines
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .unwrap_or(self.message.as_str())
    }

    /// Line counts over every file in the commit
    #[must_use]
    pub fn stats(&self) -> ChangeStats {
        self.files
            .iter()
            .fold(ChangeStats::default(), |acc, f| acc + f.stats())
    }
}

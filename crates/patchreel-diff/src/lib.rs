// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! patchreel-diff: patch-annotated log processing for patchreel
//!
//! This library crate turns the output of `git log -p` into a sequence of
//! commits, where every file touched by a commit carries an ordered list of
//! line-level changes (additions, deletions and in-place edits) ready to be
//! replayed by a renderer.

#![warn(missing_docs)]

//! # Example
//!
//! ```
//! use patchreel_diff::{Change, parse_commits};
//!
//! let log = "\
//! commit abc123
//! Author: A <a@x.com>
//! Date:   Mon Nov 14 13:45:44 2022 +0100
//!
//!     Fix typo
//! +++ b/f.txt
//! @@ -1,3 +1,3 @@
//!  line1
//! -foo bar
//! +foo baz
//!  line3";
//!
//! let commits = parse_commits(log.lines()).expect("parse log");
//! for c in &commits {
//!     for file in &c.files {
//!         for change in &file.changes {
//!             if let Change::Edit(edit) = change {
//!                 println!("{}: {:?}", file.filename(), edit.lines[0]);
//!             }
//!         }
//!     }
//! }
//! ```

pub mod coalesce;
pub mod error;
pub mod model;
pub mod scanner;
pub mod stream;

pub use coalesce::{coalesce, coalesce_commit};
pub use error::{ParseError, ParseErrorKind};
pub use model::{
    Addition, Change, ChangeStats, CodeFile, Commit, Deletion, Edit, EditLine, FileCommit,
    FileRegistry,
};
pub use scanner::{GIT_DATE_FORMAT, HunkHeader, LineScanner, Scanner};
pub use stream::{CommitStream, parse_commits, scan_commits};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ParseError, ParseErrorKind};
    pub use crate::model::{Change, Commit, EditLine, FileCommit};
    pub use crate::stream::{CommitStream, parse_commits};
}

// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the log scanner
//!
//! Feeds arbitrary text through `parse_commits`. Every edit must rebuild the
//! one-line deletion and the first added line the scanner produced at its
//! position, and coalescing the result again must change nothing.

#![no_main]

use libfuzzer_sys::fuzz_target;

use patchreel_diff::{Change, coalesce, parse_commits, scan_commits};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Errors are expected; panics are not
        let Ok(commits) = parse_commits(input.lines()) else {
            return;
        };
        let raw = scan_commits(input.lines()).expect("scanning succeeds when parsing does");
        assert_eq!(raw.len(), commits.len());

        for (commit, raw_commit) in commits.into_iter().zip(&raw) {
            for (file_commit, raw_file) in commit.files.into_iter().zip(&raw_commit.files) {
                for change in &file_commit.changes {
                    assert!(change.line_count() > 0);
                    let Change::Edit(edit) = change else { continue };
                    let line = edit.first_line_number;
                    let edit_line = &edit.lines[0];
                    // Several raw changes may share a position; the edit matches one of them
                    assert!(raw_file.changes.iter().any(|c| matches!(
                        c,
                        Change::Deletion(d) if d.first_line_number == line && d.lines == [edit_line.old_line()]
                    )));
                    assert!(raw_file.changes.iter().any(|c| matches!(
                        c,
                        Change::Addition(a) if a.first_line_number == line && a.lines.first() == Some(&edit_line.new_line())
                    )));
                }

                let mut again = file_commit.clone();
                coalesce(&mut again);
                assert_eq!(again, file_commit);
            }
        }
    }
});

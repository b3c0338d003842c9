// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Change coalescing
//!
//! The scanner emits one change per burst of `+` or `-` lines. This module
//! refines those bursts for a file commit in three fixed passes:
//!
//! 1. a one-line deletion directly followed by an addition at the same
//!    position becomes an in-place [`Edit`] when the two lines share enough
//!    text at their ends,
//! 2. adjacent additions covering contiguous positions are merged,
//! 3. adjacent deletions covering contiguous positions are merged.
//!
//! Every pass rebuilds the change list from the previous one, so running
//! [`coalesce`] a second time leaves the list unchanged.

use tracing::{trace, warn};

use crate::model::{Addition, Change, Commit, Deletion, Edit, EditLine, FileCommit};

/// Coalesce the raw changes of one file commit in place
pub fn coalesce(file_commit: &mut FileCommit) {
    if !file_commit.is_ordered() {
        warn!(
            file = %file_commit.filename(),
            "Changes are not in line order, only adjacent pairs will be coalesced"
        );
    }

    let changes = std::mem::take(&mut file_commit.changes);
    let changes = detect_line_edits(changes);
    let changes = merge_contiguous(changes, addition_run);
    file_commit.changes = merge_contiguous(changes, deletion_run);
}

/// Coalesce every file commit of a commit
pub fn coalesce_commit(commit: &mut Commit) {
    for file_commit in &mut commit.files {
        coalesce(file_commit);
    }
}

/// Pass 1: turn one-line replacements into edits
fn detect_line_edits(changes: Vec<Change>) -> Vec<Change> {
    let mut out = Vec::with_capacity(changes.len());
    let mut pending = changes.into_iter().peekable();

    while let Some(change) = pending.next() {
        let Change::Deletion(deletion) = change else {
            out.push(change);
            continue;
        };

        let edit_line = match pending.peek() {
            Some(Change::Addition(addition)) => line_edit(&deletion, addition),
            _ => None,
        };
        let Some(edit_line) = edit_line else {
            out.push(Change::Deletion(deletion));
            continue;
        };

        trace!(
            line = deletion.first_line_number,
            deleted = %edit_line.deleted,
            added = %edit_line.added,
            "Joined deletion and addition into edit"
        );
        out.push(Change::Edit(Edit {
            first_line_number: deletion.first_line_number,
            lines: vec![edit_line],
        }));

        // The edit consumed the first added line; keep whatever follows it.
        if let Some(Change::Addition(mut addition)) = pending.next() {
            addition.lines.remove(0);
            if !addition.lines.is_empty() {
                addition.first_line_number = addition.first_line_number.saturating_add(1);
                out.push(Change::Addition(addition));
            }
        }
    }

    out
}

/// Build an edit line when a deletion and the following addition qualify
fn line_edit(deletion: &Deletion, addition: &Addition) -> Option<EditLine> {
    if deletion.first_line_number != addition.first_line_number {
        return None;
    }
    let [deleted] = deletion.lines.as_slice() else {
        return None;
    };
    let added = addition.lines.first()?;

    let (prefix, suffix) = common_affixes(deleted, added);
    let shared = deleted[..prefix].chars().count() + deleted[deleted.len() - suffix..].chars().count();
    let shortest = deleted.chars().count().min(added.chars().count());
    if shared < shortest / 2 {
        return None;
    }

    Some(EditLine {
        common_start: deleted[..prefix].to_string(),
        deleted: deleted[prefix..deleted.len() - suffix].to_string(),
        added: added[prefix..added.len() - suffix].to_string(),
        common_end: deleted[deleted.len() - suffix..].to_string(),
    })
}

/// Byte lengths of the common prefix and common suffix of two strings
///
/// The suffix is searched only in what the prefix leaves over, so the two
/// never overlap in either string. Both lengths fall on char boundaries.
fn common_affixes(a: &str, b: &str) -> (usize, usize) {
    let prefix: usize = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    let suffix: usize = a[prefix..]
        .chars()
        .rev()
        .zip(b[prefix..].chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    (prefix, suffix)
}

type RunOf = fn(&mut Change) -> Option<(usize, &mut Vec<String>)>;

fn addition_run(change: &mut Change) -> Option<(usize, &mut Vec<String>)> {
    match change {
        Change::Addition(a) => Some((a.first_line_number, &mut a.lines)),
        _ => None,
    }
}

fn deletion_run(change: &mut Change) -> Option<(usize, &mut Vec<String>)> {
    match change {
        Change::Deletion(d) => Some((d.first_line_number, &mut d.lines)),
        _ => None,
    }
}

/// Passes 2 and 3: merge adjacent runs of one kind that cover contiguous lines
///
/// The merged run stays the last element of the output, so chains of three or
/// more contiguous runs collapse into the first one.
fn merge_contiguous(changes: Vec<Change>, run_of: RunOf) -> Vec<Change> {
    let mut out: Vec<Change> = Vec::with_capacity(changes.len());

    for mut change in changes {
        if let Some(last) = out.last_mut() {
            if let (Some((first, lines)), Some((next_first, next_lines))) =
                (run_of(last), run_of(&mut change))
            {
                if first.checked_add(lines.len()) == Some(next_first) {
                    lines.append(next_lines);
                    continue;
                }
            }
        }
        out.push(change);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeFile, FileRegistry};
    use similar_asserts::assert_eq;
    use std::sync::Arc;

    fn file_commit(changes: Vec<Change>) -> FileCommit {
        FileCommit {
            file: Arc::new(CodeFile {
                filename: "f.txt".to_string(),
            }),
            changes,
        }
    }

    fn add(first: usize, lines: &[&str]) -> Change {
        Change::Addition(Addition {
            first_line_number: first,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        })
    }

    fn del(first: usize, lines: &[&str]) -> Change {
        Change::Deletion(Deletion {
            first_line_number: first,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        })
    }

    fn edit(first: usize, start: &str, deleted: &str, added: &str, end: &str) -> Change {
        Change::Edit(Edit {
            first_line_number: first,
            lines: vec![EditLine {
                common_start: start.to_string(),
                deleted: deleted.to_string(),
                added: added.to_string(),
                common_end: end.to_string(),
            }],
        })
    }

    #[test]
    fn test_one_line_replacement_becomes_edit() {
        let mut fc = file_commit(vec![del(1, &["foo bar"]), add(1, &["foo baz"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes, vec![edit(1, "foo ba", "r", "z", "")]);
    }

    #[test]
    fn test_edit_with_prefix_and_suffix() {
        let mut fc = file_commit(vec![del(3, &["let x = 1;"]), add(3, &["let x = 42;"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes, vec![edit(3, "let x = ", "1", "42", ";")]);
    }

    #[test]
    fn test_dissimilar_lines_stay_separate() {
        let original = vec![del(0, &["abcdef"]), add(0, &["uvwxyz"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);
    }

    #[test]
    fn test_threshold_is_half_of_shorter_line() {
        // shorter line has 5 chars, half is 2; one shared char is not enough
        let mut fc = file_commit(vec![del(0, &["axxxx"]), add(0, &["ayyyyyyyy"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes.len(), 2);

        // two shared chars meet the threshold
        let mut fc = file_commit(vec![del(0, &["abxxx"]), add(0, &["abyyyyyyy"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes, vec![edit(0, "ab", "xxx", "yyyyyyy", "")]);
    }

    #[test]
    fn test_suffix_does_not_overlap_prefix() {
        let mut fc = file_commit(vec![del(0, &["aa"]), add(0, &["aaa"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes, vec![edit(0, "aa", "", "a", "")]);
    }

    #[test]
    fn test_edit_consumes_only_first_added_line() {
        let mut fc = file_commit(vec![
            del(4, &["value = 1"]),
            add(4, &["value = 2", "other = 3", "more = 4"]),
        ]);
        coalesce(&mut fc);
        assert_eq!(
            fc.changes,
            vec![
                edit(4, "value = ", "1", "2", ""),
                add(5, &["other = 3", "more = 4"]),
            ]
        );
    }

    #[test]
    fn test_multi_line_deletion_is_not_an_edit() {
        let original = vec![del(2, &["foo bar", "second"]), add(2, &["foo baz"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);
    }

    #[test]
    fn test_different_positions_are_not_an_edit() {
        let original = vec![del(2, &["foo bar"]), add(3, &["foo baz"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);
    }

    #[test]
    fn test_addition_before_deletion_is_not_an_edit() {
        let original = vec![add(2, &["foo baz"]), del(3, &["foo bar"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);
    }

    #[test]
    fn test_multibyte_lines() {
        let mut fc = file_commit(vec![del(0, &["héllo wörld"]), add(0, &["héllo wörd"])]);
        coalesce(&mut fc);
        let Change::Edit(e) = &fc.changes[0] else {
            panic!("expected an edit, got {:?}", fc.changes[0]);
        };
        assert_eq!(e.lines[0].old_line(), "héllo wörld");
        assert_eq!(e.lines[0].new_line(), "héllo wörd");
        assert_eq!(e.lines[0].common_start, "héllo wör");
        assert_eq!(e.lines[0].common_end, "d");
    }

    #[test]
    fn test_contiguous_additions_merge() {
        let mut fc = file_commit(vec![add(0, &["a"]), add(1, &["b", "c"]), add(3, &["d"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes, vec![add(0, &["a", "b", "c", "d"])]);
    }

    #[test]
    fn test_runs_at_end_of_numbering_do_not_overflow() {
        let last = usize::MAX - 1;
        let original = vec![add(last, &["a", "b"]), add(last, &["c"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);

        let mut fc = file_commit(vec![del(usize::MAX, &["x"]), del(usize::MAX, &["y"])]);
        coalesce(&mut fc);
        assert_eq!(fc.changes.len(), 2);
    }

    #[test]
    fn test_non_contiguous_additions_stay_apart() {
        let original = vec![add(0, &["a"]), add(2, &["c"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);
    }

    #[test]
    fn test_contiguous_deletions_merge() {
        let mut fc = file_commit(vec![
            del(0, &["a", "b"]),
            del(2, &["c"]),
            del(3, &["d"]),
            del(9, &["z"]),
        ]);
        coalesce(&mut fc);
        assert_eq!(fc.changes, vec![del(0, &["a", "b", "c", "d"]), del(9, &["z"])]);
    }

    #[test]
    fn test_runs_of_different_kinds_do_not_merge() {
        let original = vec![add(0, &["a"]), del(1, &["b"])];
        let mut fc = file_commit(original.clone());
        coalesce(&mut fc);
        assert_eq!(fc.changes, original);
    }

    #[test]
    fn test_edit_remainder_merges_with_next_addition() {
        let mut fc = file_commit(vec![
            del(0, &["name: old"]),
            add(0, &["name: new", "x"]),
            add(2, &["y"]),
        ]);
        coalesce(&mut fc);
        assert_eq!(
            fc.changes,
            vec![edit(0, "name: ", "old", "new", ""), add(1, &["x", "y"])]
        );
    }

    #[test]
    fn test_coalesce_is_idempotent() {
        let mut fc = file_commit(vec![
            del(0, &["name: old"]),
            add(0, &["name: new", "x"]),
            add(2, &["y"]),
            del(5, &["gone"]),
            del(6, &["also gone"]),
        ]);
        coalesce(&mut fc);
        let once = fc.changes.clone();
        coalesce(&mut fc);
        assert_eq!(fc.changes, once);
    }

    #[test]
    fn test_empty_file_commit() {
        let mut fc = file_commit(Vec::new());
        coalesce(&mut fc);
        assert!(fc.changes.is_empty());
    }

    #[test]
    fn test_coalesce_commit_covers_every_file() {
        let mut registry = FileRegistry::new();
        let mut commit = Commit::new("abc");
        for name in ["a.txt", "b.txt"] {
            let (file, _) = registry.resolve(name);
            commit.files.push(FileCommit {
                file,
                changes: vec![add(0, &["a"]), add(1, &["b"])],
            });
        }
        coalesce_commit(&mut commit);
        for fc in &commit.files {
            assert_eq!(fc.changes, vec![add(0, &["a", "b"])]);
        }
    }

    #[test]
    fn test_common_affixes() {
        assert_eq!(common_affixes("foo bar", "foo baz"), (6, 0));
        assert_eq!(common_affixes("abc", "xbc"), (0, 2));
        assert_eq!(common_affixes("", "abc"), (0, 0));
        assert_eq!(common_affixes("same", "same"), (4, 0));
    }
}

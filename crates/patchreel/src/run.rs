// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Log loading and report output
//!
//! This module streams a `git log -p` text through the scanner and writes the
//! resulting model in the configured format.
//!
//! # Example
//!
//! ```
//! use patchreel::config::OutputFormat;
//! use patchreel::run::{LoadOptions, read_commits, write_report};
//!
//! let log = "commit abc\n+++ b/a.txt\n@@ -0,0 +1,1 @@\n+hello\n";
//! let commits = read_commits(log.as_bytes(), &LoadOptions::default()).expect("parse");
//!
//! let mut out = Vec::new();
//! write_report(&commits, OutputFormat::Summary, &mut out).expect("write");
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use thiserror::Error;
use tracing::{debug, info};

use patchreel_diff::{ChangeStats, Commit, CommitStream, ParseError, Scanner};

use crate::config::{Config, ConfigError, OutputFormat};

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while processing a log
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error reading the log or writing the report
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The log could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Options and Statistics
// ============================================================================

/// Options for turning lines into commits
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Maximum commits to return
    pub max_commits: usize,
    /// Keep raw scanner bursts instead of coalescing them
    pub raw: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_commits: usize::MAX,
            raw: false,
        }
    }
}

impl From<&Config> for LoadOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_commits: config.commit_limit(),
            raw: config.raw,
        }
    }
}

/// Totals over a processed log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of commits produced
    pub commits: usize,
    /// Number of file sections across all commits
    pub files: usize,
    /// Number of changes across all files
    pub changes: usize,
    /// Line counts across all changes
    pub lines: ChangeStats,
}

impl RunStats {
    /// Compute totals for a list of commits
    #[must_use]
    pub fn from_commits(commits: &[Commit]) -> Self {
        let mut stats = Self {
            commits: commits.len(),
            ..Default::default()
        };
        for commit in commits {
            stats.files += commit.files.len();
            stats.changes += commit.files.iter().map(|f| f.changes.len()).sum::<usize>();
            stats.lines += commit.stats();
        }
        stats
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Read commits from a log, one line at a time
///
/// Both `\n` and `\r\n` line endings are accepted. Reading stops at the
/// start of the commit after the last one kept, so nothing past the commit
/// limit is read.
///
/// # Errors
///
/// Returns an IO error if reading fails or a line read is not valid UTF-8,
/// and the first parse error met within the kept commits.
pub fn read_commits(
    reader: impl BufRead,
    options: &LoadOptions,
) -> Result<Vec<Commit>, RunError> {
    let mut io_error = None;
    let lines = reader
        .lines()
        .map_while(|line| line.map_err(|e| io_error = Some(e)).ok());
    let result = collect_commits(lines, options);

    // A failed read ends the line stream early; report it over whatever the
    // scanner made of the truncated input.
    if let Some(e) = io_error {
        return Err(e.into());
    }
    Ok(result?)
}

/// Turn log lines already in memory into commits
///
/// # Errors
///
/// Returns the first parse error met within the first
/// `options.max_commits` commits.
pub fn load_commits<S: AsRef<str>>(
    lines: &[S],
    options: &LoadOptions,
) -> Result<Vec<Commit>, ParseError> {
    collect_commits(lines.iter(), options)
}

fn collect_commits<I>(lines: I, options: &LoadOptions) -> Result<Vec<Commit>, ParseError>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    if options.raw {
        Scanner::new(lines).take(options.max_commits).collect()
    } else {
        CommitStream::new(lines).take(options.max_commits).collect()
    }
}

/// Write commits in the given format
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report(
    commits: &[Commit],
    format: OutputFormat,
    mut out: impl Write,
) -> Result<(), RunError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, commits)?;
            writeln!(out)?;
        }
        OutputFormat::Summary => {
            for commit in commits {
                writeln!(out, "{}", summary_line(commit))?;
                for file in &commit.files {
                    let stats = file.stats();
                    writeln!(
                        out,
                        "    {} +{} -{} ~{}",
                        file.filename(),
                        stats.insertions,
                        stats.deletions,
                        stats.edits
                    )?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// One-line description of a commit
///
/// Format: `<short-hash> <date> +<insertions> -<deletions> ~<edits> <subject>`
/// where the date and the subject are omitted when the log had none.
#[must_use]
pub fn summary_line(commit: &Commit) -> String {
    let stats = commit.stats();
    let mut line = commit.short_hash().to_string();
    if let Some(timestamp) = commit.timestamp {
        line.push_str(&format!(" {}", timestamp.format("%Y-%m-%d")));
    }
    line.push_str(&format!(
        " +{} -{} ~{}",
        stats.insertions, stats.deletions, stats.edits
    ));
    let subject = commit.subject();
    if !subject.is_empty() {
        line.push(' ');
        line.push_str(subject);
    }
    line
}

/// Run the whole pipeline for a configuration, writing to stdout
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be
/// read, the log cannot be parsed, or the report cannot be written.
pub fn run(config: &Config) -> Result<RunStats, RunError> {
    config.validate()?;

    let options = LoadOptions::from(config);
    let commits = match config.input_path() {
        Some(path) => {
            info!(path = %path.display(), "Reading log");
            read_commits(BufReader::new(File::open(path)?), &options)?
        }
        None => {
            info!("Reading log from stdin");
            read_commits(io::stdin().lock(), &options)?
        }
    };
    debug!(limit = options.max_commits, "Log read");

    let stats = RunStats::from_commits(&commits);
    info!(
        commits = stats.commits,
        files = stats.files,
        changes = stats.changes,
        raw = config.raw,
        "Log parsed"
    );

    write_report(&commits, config.format, io::stdout().lock())?;
    Ok(stats)
}

//! Configuration for the patchreel command
//!
//! This module provides the command-line configuration: where the log comes
//! from, how much of it to process, how to print the model and how much to log.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

/// Patchreel - turn `git log -p` output into replayable line-level changes
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "patchreel")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to a file holding `git log -p` output
    ///
    /// Reads standard input when omitted or set to `-`.
    pub input: Option<PathBuf>,

    /// Only process the first N commits of the log
    ///
    /// Reading stops at the line starting commit N+1, so errors further down
    /// the log are not reported.
    #[arg(short = 'n', long, env = "PATCHREEL_MAX_COMMITS")]
    pub max_commits: Option<usize>,

    /// Print the raw scanner output without coalescing changes
    #[arg(long, default_value = "false")]
    pub raw: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the model output.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// How the parsed model is written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of commits
    #[default]
    Json,
    /// One line per commit and per file with change counts
    Summary,
}

impl Config {
    /// Get the input file, or `None` when reading standard input
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Get the number of commits to process
    #[must_use]
    pub fn commit_limit(&self) -> usize {
        self.max_commits.unwrap_or(usize::MAX)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input path is specified but doesn't exist or is not a file
    /// - `--max-commits` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = self.input_path() {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.to_path_buf()));
            }
        }

        if self.max_commits == Some(0) {
            return Err(ConfigError::ZeroMaxCommits);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input path not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),

    /// A commit limit of zero would produce nothing
    #[error("--max-commits must be at least 1")]
    ZeroMaxCommits,
}

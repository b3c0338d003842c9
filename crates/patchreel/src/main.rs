//! patchreel: turn patch-annotated git logs into replayable changes
//!
//! This binary reads `git log -p` output, builds the commit/file/change model
//! and prints it for a renderer or for inspection.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use patchreel::config::Config;
use patchreel::run::run;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting patchreel...");

    let stats = run(&config).context("Failed to process log")?;
    info!(
        commits = stats.commits,
        insertions = stats.lines.insertions,
        deletions = stats.lines.deletions,
        edits = stats.lines.edits,
        "Done"
    );
    Ok(())
}

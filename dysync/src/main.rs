//! dysync - DynamoDB cross-account table sync
//!
//! Copies every item of a table from the source account into the same table
//! in the destination account, then deletes destination items the source no
//! longer has. Filters (`--id`, `--sk`) and `--copy-only` skip the delete
//! phase; `--dryrun` logs what would change without writing.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use dysync_core::{connect, DynamoTable, Side, SyncEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = cli.sync_config();
    let plan = config.plan().context("invalid sync configuration")?;

    let (source, destination) = tokio::join!(
        connect(Side::Source, &config.source),
        connect(Side::Destination, &config.destination),
    );
    let engine = SyncEngine::new(
        Arc::new(DynamoTable::new(source)),
        Arc::new(DynamoTable::new(destination)),
        plan,
    );

    let report =
        engine.run().await.with_context(|| format!("sync of table {} failed", config.table))?;

    info!("{}", report.tally);
    info!("duration: {:?}", Duration::from_millis(report.elapsed_ms));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let status = if report.tally.has_failures() { "✗".red() } else { "✓".green() };
        let dry_run = if report.dry_run { " (dry run)" } else { "" };
        println!("{} {}{}: {}", status, report.table.bold(), dry_run, report.tally);
    }

    Ok(())
}

/// Logs go to stderr; stdout carries only the report.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

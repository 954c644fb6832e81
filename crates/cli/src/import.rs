use std::{path::PathBuf, process::ExitCode, time::Instant};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, info};
use tracksink_runtime::{DEFAULT_BATCH_SIZE, DbConfig, EVENT_TABLE, PROGRAM_NAME};
use tracksink_store::{CommitReport, PgSink};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Streaming history JSON file to import (required)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: PathBuf,

    /// Records per transaction; zero or negative falls back to the default
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_BATCH_SIZE as i64,
        allow_negative_numbers = true
    )]
    pub batch_size: i64,

    /// Log per-batch progress to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

pub fn run(args: ImportArgs) -> ExitCode {
    match execute(&args) {
        Ok(report) => {
            println!(
                "Imported {} records in {} batches into {}",
                report.records, report.batches, EVENT_TABLE
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[{PROGRAM_NAME}] {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Configuration is checked before the file is touched, and the file is
/// fully decoded before a connection is opened.
pub fn execute(args: &ImportArgs) -> Result<CommitReport> {
    let config = DbConfig::from_env().context("database configuration")?;
    debug!("using {config:?}");

    let records = tracksink_model::load(&args.file)?;
    info!(
        "loaded {} playback events from {}",
        records.len(),
        args.file.display()
    );

    let mut sink = PgSink::connect(&config)?;

    let started = Instant::now();
    let report = tracksink_store::commit(&mut sink, records.records(), args.batch_size)
        .context("import halted")?;
    info!(
        "imported {} records in {} batches ({} ms)",
        report.records,
        report.batches,
        started.elapsed().as_millis()
    );

    Ok(report)
}

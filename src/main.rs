// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line entry point: load an event log, scan it, print the streaks.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;
use streak_search::enumerate::DEFAULT_EXPLOSION_THRESHOLD;
use streak_search::index::records::parse_date;
use streak_search::{
    render, Algorithm, DateRange, Deadline, EventLog, PartitionMode, Result, ScanConfig, Scanner,
    Step,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// MediaWiki table
    Wiki,
    /// One line per streak
    Plain,
}

#[derive(Parser, Debug)]
#[command(name = "streaks")]
#[command(about = "Find the longest runs of days with a different participant each day", long_about = None)]
#[command(version)]
struct Cli {
    /// Event log (JSON)
    events: PathBuf,

    /// First start date to try (default: first date in the log)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last start date to try (default: last date in the log)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Walk backward in time from each start date
    #[arg(long)]
    backward: bool,

    /// Do not report streaks shorter than this
    #[arg(long, default_value_t = 0)]
    min_length: usize,

    /// Give up on a single start date after this many milliseconds of CPU time
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Partitioning: all, same (one scan per graticule), or a graticule label
    #[arg(long, default_value = "all")]
    partition: PartitionMode,

    #[arg(long, value_enum, default_value_t = Algorithm::Backtrack)]
    algorithm: Algorithm,

    /// Live set count that triggers an explosion warning (set enumeration)
    #[arg(long, default_value_t = DEFAULT_EXPLOSION_THRESHOLD)]
    explosion_threshold: usize,

    #[arg(long, value_enum, default_value_t = Format::Wiki)]
    format: Format,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Err(err) = run(&cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let log = EventLog::load(&cli.events)?;
    info!("Read {} expedition(s) from {}", log.len(), cli.events.display());

    let config = ScanConfig {
        range: requested_range(cli, &log)?,
        step: if cli.backward {
            Step::Backward
        } else {
            Step::Forward
        },
        deadline: cli
            .timeout_ms
            .map_or(Deadline::Unbounded, |ms| Deadline::after(Duration::from_millis(ms))),
        min_length: cli.min_length,
        partition_mode: cli.partition.clone(),
        algorithm: cli.algorithm,
        explosion_threshold: cli.explosion_threshold,
    };

    let outcome = Scanner::new(config).run(&log)?;
    let text = match cli.format {
        Format::Wiki => render::wiki_table(&outcome.reports),
        Format::Plain => render::plain(&outcome.reports),
    };
    print!("{}", text);
    Ok(())
}

/// The start-date range from `--from`/`--to`; a missing end defaults to the
/// log's own span.
fn requested_range(cli: &Cli, log: &EventLog) -> Result<Option<DateRange>> {
    if cli.from.is_none() && cli.to.is_none() {
        return Ok(None);
    }
    let span = log.date_span();
    let first = cli.from.or(span.map(|(first, _)| first));
    let last = cli.to.or(span.map(|(_, last)| last));
    match (first, last) {
        (Some(first), Some(last)) => DateRange::new(first, last).map(Some),
        (Some(only), None) | (None, Some(only)) => DateRange::new(only, only).map(Some),
        (None, None) => Ok(None),
    }
}

//! # hist - History of a file in the dump
//!
//! Replays every snapshot of a path, from the oldest one (or `-e`) up to the
//! date of the given path, and prints what changed between consecutive
//! snapshots.
//!
//! ## Usage
//! ```bash
//! # Hourly history of a live file, with line diffs
//! hist doc/notes.txt
//!
//! # At most one snapshot per day, report changes without diffs
//! hist -d -c doc/notes.txt
//!
//! # History up to a given snapshot, starting in 2016
//! hist -e /dump/2016 /dump/2017/0415/0036/NEWAGE/doc/notes.txt
//!
//! # Machine readable events
//! hist --json doc
//! ```

use chrono::Local;
use clap::{Parser, ValueEnum};
use colored::*;
use dumpnav::{
    codec, utils, DiffUnit, DumpDate, Event, FsLister, Granularity, History, HistoryOptions,
    NavError, Navigator, Result, Roots, SequenceBuilder, SimilarDiffer,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Show the history of a path across the snapshots of the dump
#[derive(Parser)]
#[command(name = "hist")]
#[command(version)]
#[command(about = "Show how a file or directory changed across dump snapshots")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug traces
    #[arg(short = 'D', long)]
    debug: bool,

    /// Attach directory listings to create and write events
    #[arg(short, long)]
    verbose: bool,

    /// Report changes without diffs
    #[arg(short, long)]
    changes: bool,

    /// Diff even when contents look binary
    #[arg(short, long)]
    text: bool,

    /// At most one snapshot per year
    #[arg(short, long)]
    yearly: bool,

    /// At most one snapshot per month
    #[arg(short, long)]
    monthly: bool,

    /// At most one snapshot per day
    #[arg(short, long)]
    daily: bool,

    /// At most one snapshot per hour (default when no filter is given)
    #[arg(short = 'H', long)]
    hourly: bool,

    /// Earliest snapshot to consider, as a dump path
    #[arg(short, long, value_name = "DUMP_PATH")]
    earliest: Option<PathBuf>,

    /// Diff granularity
    #[arg(long, value_enum, default_value = "lines")]
    unit: UnitArg,

    /// Print events as JSON, one per line
    #[arg(long)]
    json: bool,

    /// File or directory, live or inside a snapshot
    path: PathBuf,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum UnitArg {
    Lines,
    Words,
    Chars,
}

impl From<UnitArg> for DiffUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Lines => DiffUnit::Lines,
            UnitArg::Words => DiffUnit::Words,
            UnitArg::Chars => DiffUnit::Chars,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.debug {
        EnvFilter::new("dumpnav=trace,hist=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = utils::absolutize(&cli.path, &cwd);
    debug!("path {}", path.display());

    let roots = Roots::from_env();
    let lister = FsLister;
    let nav = Navigator::new(&lister, &roots);

    let upper = nav.target_date(&path, Local::now().naive_local());
    debug!("date {}", upper);
    let latest = nav.locate(&path, &upper)?;
    debug!("latest copy {}", latest.display());

    let lower = match &cli.earliest {
        Some(earliest) => {
            let earliest = utils::absolutize(earliest, &cwd);
            if !roots.is_dump(&earliest) {
                return Err(NavError::PathOutsideRoot {
                    path: earliest,
                    root: roots.dump_root().to_path_buf(),
                });
            }
            codec::decode(&earliest, &roots)?
        }
        None => DumpDate::ZERO,
    };

    let mut granularity = Granularity {
        yearly: cli.yearly,
        monthly: cli.monthly,
        daily: cli.daily,
        hourly: cli.hourly,
    };
    if !granularity.any() {
        granularity = Granularity::hourly();
    }

    let snapshots = SequenceBuilder::new(&lister, &roots)
        .granularity(granularity)
        .build(&upper, &lower)?;
    let suffix = codec::snapshot_suffix(&path, &roots)?;
    debug!("{} snapshots, suffix {}", snapshots.len(), suffix.display());

    let options = HistoryOptions {
        changes_only: cli.changes,
        force_text: cli.text,
        verbose: cli.verbose,
        diff_unit: cli.unit.into(),
    };
    let differ = SimilarDiffer::new(options.diff_unit);
    let history = History::new(&differ, options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    history.replay(&snapshots, &suffix, |event| {
        if event.is_skipped() {
            eprintln!("{} {}", "skipped".yellow(), event);
        } else if cli.json {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        } else {
            print_event(&mut out, &event)?;
        }
        Ok(())
    })?;
    out.flush()?;
    Ok(())
}

/// Print an event, coloring its tag and diff lines
fn print_event(out: &mut impl Write, event: &Event) -> io::Result<()> {
    let rendered = event.to_string();
    match event {
        Event::Diff { .. } => {
            for line in rendered.lines() {
                if line.starts_with('<') {
                    writeln!(out, "{}", line.red())?;
                } else if line.starts_with('>') {
                    writeln!(out, "{}", line.green())?;
                } else if line.is_empty() {
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}", line.cyan())?;
                }
            }
            Ok(())
        }
        _ => {
            let (tag, rest) = rendered.split_once('\t').unwrap_or((rendered.as_str(), ""));
            let tag = match event {
                Event::Create { .. } => tag.green().bold(),
                Event::Delete { .. } => tag.red().bold(),
                Event::Write { .. } => tag.yellow().bold(),
                _ => tag.cyan().bold(),
            };
            writeln!(out, "{}\t{}", tag, rest)
        }
    }
}

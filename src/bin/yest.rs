//! # yest - Where was this file yesterday?
//!
//! Prints the path of a file or directory in the snapshot closest to, but not
//! after, some time ago. The offset defaults to one day.
//!
//! ## Usage
//! ```bash
//! # Yesterday's copy of a live file
//! yest doc/notes.txt
//!
//! # The copy from three months and two hours before a snapshot
//! yest -d 0 -m 3 -H 2 /dump/2017/0415/0036/NEWAGE/doc/notes.txt
//!
//! # Compare with yesterday
//! diff $(yest notes.txt) notes.txt
//! ```

use chrono::Local;
use clap::Parser;
use colored::*;
use dumpnav::{utils, DumpDate, FsLister, NavError, Navigator, Result, Roots};
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Locate an older copy of a path in the dump
#[derive(Parser)]
#[command(name = "yest")]
#[command(version)]
#[command(about = "Print the path of an older copy of a file in the dump")]
#[command(long_about = None)]
struct Cli {
    /// Years ago
    #[arg(short = 'y', long, default_value_t = 0, value_parser = offset_parser())]
    years: i64,

    /// Months ago
    #[arg(short = 'm', long, default_value_t = 0, value_parser = offset_parser())]
    months: i64,

    /// Days ago
    #[arg(short = 'd', long, default_value_t = 1, value_parser = offset_parser())]
    days: i64,

    /// Hours ago
    #[arg(short = 'H', long, default_value_t = 0, value_parser = offset_parser())]
    hours: i64,

    /// Enable debug traces
    #[arg(short = 'D', long)]
    debug: bool,

    /// File or directory, live or inside a snapshot
    path: PathBuf,
}

/// Offsets whose negation still fits in an `i64`
fn offset_parser() -> clap::builder::RangedI64ValueParser<i64> {
    clap::value_parser!(i64).range(-i64::MAX..)
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.debug {
        EnvFilter::new("dumpnav=trace,yest=trace")
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

    match run(cli) {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let path = utils::absolutize(&cli.path, &cwd);
    let delta = DumpDate::new(-cli.years, -cli.months, -cli.days, -cli.hours);
    debug!("path {}, offset {}", path.display(), delta);

    let roots = Roots::from_env();
    let lister = FsLister;
    let nav = Navigator::new(&lister, &roots);

    let date = nav.shifted_date(&path, Local::now().naive_local(), &delta)?;
    debug!("date {}", date);
    let found = nav.locate(&path, &date)?;

    if let Err(e) = std::fs::symlink_metadata(&found) {
        warn!("path does not exist: {}: {}", found.display(), e);
    }
    if found.starts_with(&path) {
        return Err(NavError::NoEarlierCopy { path });
    }
    Ok(found)
}
